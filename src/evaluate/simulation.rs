//! Discrete-event simulation of a schedule through the four-stage pipeline.

use std::collections::{BTreeMap, HashMap};

use crate::model::{JobId, ProductionData, Schedule, StageKey, Workcenter};

/// One processed operation on a machine timeline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduledOperation {
    pub job: JobId,
    pub start: f64,
    pub end: f64,
}

/// Timelines and completion times derived from a schedule.
///
/// Recomputed on every evaluation; never stored on the [`Schedule`].
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    timelines: BTreeMap<StageKey, Vec<ScheduledOperation>>,
    completions: HashMap<JobId, [Option<f64>; 4]>,
}

impl Simulation {
    pub fn timeline(&self, key: &StageKey) -> Option<&[ScheduledOperation]> {
        self.timelines.get(key).map(|v| v.as_slice())
    }

    pub fn timelines(&self) -> impl Iterator<Item = (&StageKey, &Vec<ScheduledOperation>)> {
        self.timelines.iter()
    }

    /// All operations processed in one workcenter.
    pub fn operations(&self, workcenter: Workcenter) -> impl Iterator<Item = &ScheduledOperation> {
        self.timelines
            .iter()
            .filter(move |(k, _)| k.workcenter == workcenter)
            .flat_map(|(_, ops)| ops.iter())
    }

    /// Completion time of a job in a workcenter, if it was processed there.
    pub fn completion(&self, job: &JobId, workcenter: Workcenter) -> Option<f64> {
        self.completions
            .get(job)
            .and_then(|c| c[workcenter.index()])
    }

    /// Latest end time over all timelines (0 for an empty schedule).
    pub fn makespan(&self) -> f64 {
        self.timelines
            .values()
            .flat_map(|ops| ops.iter())
            .map(|op| op.end)
            .fold(0.0, f64::max)
    }

    /// Sum of `weight × max(0, end − due)` over ASSEMBLY operations.
    ///
    /// Jobs without a due date are measured against 0.
    pub fn weighted_tardiness(&self, data: &ProductionData) -> f64 {
        self.operations(Workcenter::Assembly)
            .map(|op| {
                let due = data.due_date(&op.job).unwrap_or(0.0);
                data.weight(&op.job) * (op.end - due).max(0.0)
            })
            .sum()
    }
}

/// Simulates a schedule workcenter by workcenter in pipeline order.
///
/// Within a queue, an operation starts once the machine has finished the
/// previous job plus the sequence-dependent setup, and once the job's
/// upstream precedence is met:
///
/// - PLASTIC, SMT: no upstream precedence.
/// - PTH: after the later of the job's PLASTIC and SMT completions, for jobs
///   that completed in both.
/// - ASSEMBLY: after the job's PTH completion plus the assembly buffer.
///
/// Missing setup entries count as 0; a missing processing time makes the
/// operation complete instantly.
pub fn simulate(schedule: &Schedule, data: &ProductionData) -> Simulation {
    let mut sim = Simulation::default();
    let mut ready: HashMap<JobId, f64> = HashMap::new();

    for wc in Workcenter::PIPELINE {
        match wc {
            Workcenter::Pth => {
                ready.clear();
                let (plastic, smt) = (Workcenter::Plastic.index(), Workcenter::Smt.index());
                for (job, times) in &sim.completions {
                    if let (Some(p), Some(s)) = (times[plastic], times[smt]) {
                        ready.insert(job.clone(), p.max(s));
                    }
                }
            }
            Workcenter::Assembly => {
                ready.clear();
                let pth = Workcenter::Pth.index();
                for (job, times) in &sim.completions {
                    if let Some(t) = times[pth] {
                        ready.insert(job.clone(), t + data.assembly_buffer());
                    }
                }
            }
            Workcenter::Plastic | Workcenter::Smt => {}
        }

        for (key, seq) in schedule.stage(wc) {
            let mut ops: Vec<ScheduledOperation> = Vec::with_capacity(seq.len());
            for (i, job) in seq.iter().enumerate() {
                let machine_ready = match ops.last() {
                    Some(prev) if i > 0 => {
                        prev.end + data.setup_time(key, &seq[i - 1], job).unwrap_or(0.0)
                    }
                    _ => 0.0,
                };
                let precedence_ready = ready.get(job).copied().unwrap_or(0.0);
                let start = machine_ready.max(precedence_ready);
                let end = start + data.processing_time(job, key).unwrap_or(0.0);

                sim.completions.entry(job.clone()).or_insert([None; 4])[wc.index()] = Some(end);
                ops.push(ScheduledOperation {
                    job: job.clone(),
                    start,
                    end,
                });
            }
            sim.timelines.insert(key.clone(), ops);
        }
    }

    sim
}
