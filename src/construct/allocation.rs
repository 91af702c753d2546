//! Earliest-due-date allocation.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::error::{Result, ScheduleError};
use crate::model::{JobId, MachineId, ProductionData, Schedule, StageKey, Workcenter};

/// Builds a feasible schedule by EDD ordering and shortest-processing-time
/// machine choice.
///
/// 1. Jobs are stably sorted by due date; a job without one is an error.
/// 2. For each workcenter in pipeline order, every machine gets a queue.
///    Each job (in EDD order) goes to the eligible machine with the smallest
///    known processing time, ties broken uniformly at random. A job with no
///    eligible, timed machine in a workcenter has no operation there.
///
/// The result is reproducible up to the tie-break draws from `rng`.
pub fn build_initial_schedule<R: Rng>(
    jobs: &[JobId],
    data: &ProductionData,
    rng: &mut R,
) -> Result<Schedule> {
    let mut keyed: Vec<(f64, &JobId)> = Vec::with_capacity(jobs.len());
    for job in jobs {
        let due = data
            .due_date(job)
            .ok_or_else(|| ScheduleError::MissingDueDate(job.clone()))?;
        keyed.push((due, job));
    }
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut schedule = Schedule::new();
    for wc in Workcenter::PIPELINE {
        let machines = data.machines(wc);
        if machines.is_empty() {
            continue;
        }
        for m in machines {
            schedule.add_machine(StageKey::new(wc, m.clone()));
        }

        let mut candidates: Vec<&MachineId> = Vec::with_capacity(machines.len());
        for &(_, job) in &keyed {
            candidates.clear();
            let mut best = f64::INFINITY;
            for m in data.eligible_machines(job, wc) {
                let Some(t) = data.processing_time(job, &StageKey::new(wc, m.clone())) else {
                    continue;
                };
                if t < best {
                    best = t;
                    candidates.clear();
                    candidates.push(m);
                } else if t == best {
                    candidates.push(m);
                }
            }

            let chosen = match candidates.len() {
                0 => continue,
                1 => candidates[0],
                _ => match candidates.choose(rng) {
                    Some(m) => *m,
                    None => continue,
                },
            };

            if let Some(seq) = schedule.sequence_mut(&StageKey::new(wc, chosen.clone())) {
                seq.push(job.clone());
            }
        }
    }

    Ok(schedule)
}
