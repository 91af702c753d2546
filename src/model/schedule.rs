//! The schedule genome.

use std::collections::{BTreeMap, HashMap, HashSet};

use super::data::ProductionData;
use super::ids::{JobId, StageKey, Workcenter};

/// A complete job-to-machine sequencing: for every (workcenter, machine)
/// queue, the ordered list of jobs it processes.
///
/// Keys iterate in [`StageKey`] order (pipeline order, then machine id), so
/// every operator that walks a schedule does so deterministically.
///
/// # Validity
///
/// For every workcenter, each job with at least one eligible machine there
/// appears in exactly one machine queue of that workcenter, exactly once.
/// Jobs without an operation in a workcenter are absent from it. Use
/// [`violations`](Schedule::violations) to check.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schedule {
    sequences: BTreeMap<StageKey, Vec<JobId>>,
}

/// A population of schedules. Position pairs an individual with its
/// fitness value in index-aligned vectors.
pub type Population = Vec<Schedule>;

/// A broken validity invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The job occurs more than once across the queues of a workcenter.
    Duplicate { workcenter: Workcenter, job: JobId },
    /// The job has an eligible machine in the workcenter but is not queued.
    Missing { workcenter: Workcenter, job: JobId },
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures a (possibly empty) queue exists for `key`.
    pub fn add_machine(&mut self, key: StageKey) {
        self.sequences.entry(key).or_default();
    }

    pub fn set_sequence(&mut self, key: StageKey, jobs: Vec<JobId>) {
        self.sequences.insert(key, jobs);
    }

    pub fn sequence(&self, key: &StageKey) -> Option<&[JobId]> {
        self.sequences.get(key).map(|v| v.as_slice())
    }

    pub fn sequence_mut(&mut self, key: &StageKey) -> Option<&mut Vec<JobId>> {
        self.sequences.get_mut(key)
    }

    pub fn contains_key(&self, key: &StageKey) -> bool {
        self.sequences.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &StageKey> {
        self.sequences.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StageKey, &Vec<JobId>)> {
        self.sequences.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&StageKey, &mut Vec<JobId>)> {
        self.sequences.iter_mut()
    }

    /// Queues of one workcenter.
    pub fn stage(&self, workcenter: Workcenter) -> impl Iterator<Item = (&StageKey, &Vec<JobId>)> {
        self.sequences
            .iter()
            .filter(move |(k, _)| k.workcenter == workcenter)
    }

    /// Number of machine queues.
    pub fn machine_count(&self) -> usize {
        self.sequences.len()
    }

    /// Total number of queued operations across all machines.
    pub fn operation_count(&self) -> usize {
        self.sequences.values().map(Vec::len).sum()
    }

    /// Workcenters that have at least one queue, in pipeline order.
    pub fn workcenters(&self) -> Vec<Workcenter> {
        let mut wcs: Vec<Workcenter> = self.sequences.keys().map(|k| k.workcenter).collect();
        wcs.dedup();
        wcs
    }

    /// Lists every validity violation for the given job set.
    pub fn violations(&self, jobs: &[JobId], data: &ProductionData) -> Vec<Violation> {
        let mut out = Vec::new();
        for wc in Workcenter::PIPELINE {
            let mut counts: HashMap<&JobId, usize> = HashMap::new();
            for (_, seq) in self.stage(wc) {
                for job in seq {
                    *counts.entry(job).or_insert(0) += 1;
                }
            }
            let mut reported: HashSet<&JobId> = HashSet::new();
            for (_, seq) in self.stage(wc) {
                for job in seq {
                    if counts[job] > 1 && reported.insert(job) {
                        out.push(Violation::Duplicate {
                            workcenter: wc,
                            job: job.clone(),
                        });
                    }
                }
            }
            for job in jobs {
                if !counts.contains_key(job) && data.has_operation(job, wc) {
                    out.push(Violation::Missing {
                        workcenter: wc,
                        job: job.clone(),
                    });
                }
            }
        }
        out
    }

    pub fn is_valid(&self, jobs: &[JobId], data: &ProductionData) -> bool {
        self.violations(jobs, data).is_empty()
    }
}

impl FromIterator<(StageKey, Vec<JobId>)> for Schedule {
    fn from_iter<T: IntoIterator<Item = (StageKey, Vec<JobId>)>>(iter: T) -> Self {
        Self {
            sequences: iter.into_iter().collect(),
        }
    }
}
