//! Schedule crossover with validity repair.
//!
//! Both operators splice machine queues from one parent into a copy of the
//! other, which can duplicate jobs inside a workcenter or lose them. The
//! shared [`repair`] pass restores validity afterwards:
//!
//! 1. Scan the workcenter's queues in machine registration order and drop
//!    every occurrence of a job after its first one.
//! 2. Insert each job that has an operation in the workcenter but is no
//!    longer queued into its least-loaded eligible machine present in the
//!    child (ties go to the earlier machine).
//! 3. A job with no eligible machine in the child is dropped and logged.
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains" (OX)
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the TSP" (PMX)

use std::collections::{HashSet, VecDeque};

use rand::seq::index;
use rand::Rng;
use tracing::debug;

use crate::model::{JobId, Population, ProductionData, Schedule, StageKey, Workcenter};

/// Repairs every workcenter. Returns the number of dropped jobs.
pub fn repair(schedule: &mut Schedule, jobs: &[JobId], data: &ProductionData) -> usize {
    Workcenter::PIPELINE
        .into_iter()
        .map(|wc| repair_workcenter(schedule, wc, jobs, data))
        .sum()
}

/// Repairs one workcenter. Returns the number of dropped jobs.
pub fn repair_workcenter(
    schedule: &mut Schedule,
    workcenter: Workcenter,
    jobs: &[JobId],
    data: &ProductionData,
) -> usize {
    // Registered machines first, then queues the tables don't know about.
    let mut keys: Vec<StageKey> = data
        .machines(workcenter)
        .iter()
        .map(|m| StageKey::new(workcenter, m.clone()))
        .filter(|k| schedule.contains_key(k))
        .collect();
    for (key, _) in schedule.stage(workcenter) {
        if !keys.contains(key) {
            keys.push(key.clone());
        }
    }

    let mut seen: HashSet<JobId> = HashSet::new();
    for key in &keys {
        if let Some(seq) = schedule.sequence_mut(key) {
            seq.retain(|job| seen.insert(job.clone()));
        }
    }

    let mut dropped = 0;
    for job in jobs {
        if seen.contains(job) || !data.has_operation(job, workcenter) {
            continue;
        }
        let target = data
            .eligible_machines(job, workcenter)
            .map(|m| StageKey::new(workcenter, m.clone()))
            .filter_map(|k| schedule.sequence(&k).map(|seq| (seq.len(), k)))
            .min_by_key(|(len, _)| *len)
            .map(|(_, k)| k);

        match target.and_then(|k| schedule.sequence_mut(&k)) {
            Some(seq) => {
                seq.push(job.clone());
                seen.insert(job.clone());
            }
            None => {
                debug!(job = %job, workcenter = %workcenter, "repair dropped job: no eligible machine in child");
                dropped += 1;
            }
        }
    }

    dropped
}

/// Order-based crossover over a parent pool.
///
/// Each child starts as a copy of one randomly drawn parent. A random
/// non-empty strict subset of the machine queues both parents share (and
/// where both hold at least two jobs) takes the second parent's tail from a
/// random cut point; the affected workcenter is repaired after every key.
/// When no queue qualifies, the child is an unmodified copy.
///
/// A pool of fewer than two parents yields copies of its only member (or
/// nothing for an empty pool).
pub fn ox_crossover<R: Rng>(
    pool: &[Schedule],
    jobs: &[JobId],
    data: &ProductionData,
    offspring_count: usize,
    rng: &mut R,
) -> Population {
    let mut offspring = Vec::with_capacity(offspring_count);
    if pool.len() < 2 {
        offspring.extend(pool.iter().cycle().take(offspring_count).cloned());
        return offspring;
    }

    for _ in 0..offspring_count {
        let pair = index::sample(rng, pool.len(), 2);
        let (parent1, parent2) = (&pool[pair.index(0)], &pool[pair.index(1)]);
        let mut child = parent1.clone();

        let valid_keys: Vec<&StageKey> = parent1
            .iter()
            .filter(|(k, seq)| seq.len() >= 2 && parent2.sequence(k).is_some_and(|s| s.len() >= 2))
            .map(|(k, _)| k)
            .collect();
        if valid_keys.is_empty() {
            offspring.push(child);
            continue;
        }

        let upper = (valid_keys.len() - 1).max(1);
        let count = rng.random_range(1..=upper);
        for pick in index::sample(rng, valid_keys.len(), count) {
            let key = valid_keys[pick];
            let Some(seq) = child.sequence_mut(key) else {
                continue;
            };
            if seq.len() < 2 {
                continue;
            }
            let cut = rng.random_range(1..seq.len());
            let tail = parent2
                .sequence(key)
                .and_then(|s| s.get(cut..))
                .unwrap_or(&[]);
            seq.truncate(cut);
            seq.extend_from_slice(tail);
            repair_workcenter(&mut child, key.workcenter, jobs, data);
        }
        offspring.push(child);
    }

    offspring
}

/// Partially-mapped crossover of two parents.
///
/// The child starts as a copy of `parent2`. For up to `tuple_count` shared
/// machine queues, a random segment `[c1, c2]` of `parent1`'s queue is
/// spliced in at the same position. Jobs outside the segment that now
/// duplicate a segment job are replaced by `parent1` jobs missing from the
/// queue (or removed when none are left). One global [`repair`] follows.
pub fn pmx_crossover<R: Rng>(
    parent1: &Schedule,
    parent2: &Schedule,
    jobs: &[JobId],
    data: &ProductionData,
    tuple_count: usize,
    rng: &mut R,
) -> Schedule {
    let mut child = parent2.clone();
    let common: Vec<&StageKey> = parent2.keys().filter(|k| parent1.contains_key(k)).collect();
    let count = tuple_count.min(common.len());

    for pick in index::sample(rng, common.len(), count) {
        let key = common[pick];
        let donor = parent1.sequence(key).unwrap_or(&[]);
        if donor.len() < 2 {
            continue;
        }
        let cuts = index::sample(rng, donor.len(), 2);
        let (c1, c2) = {
            let (a, b) = (cuts.index(0), cuts.index(1));
            (a.min(b), a.max(b))
        };
        let segment = &donor[c1..=c2];

        if let Some(seq) = child.sequence_mut(key) {
            let start = c1.min(seq.len());
            let end = (c2 + 1).min(seq.len());
            seq.splice(start..end, segment.iter().cloned());
            let spliced = start..start + segment.len();

            let in_segment: HashSet<&JobId> = segment.iter().collect();
            let present: HashSet<&JobId> = seq.iter().collect();
            let mut fillers: VecDeque<JobId> = donor
                .iter()
                .filter(|j| !present.contains(j))
                .cloned()
                .collect();

            let resolved: Vec<JobId> = seq
                .iter()
                .enumerate()
                .filter_map(|(i, job)| {
                    if spliced.contains(&i) || !in_segment.contains(job) {
                        Some(job.clone())
                    } else {
                        fillers.pop_front()
                    }
                })
                .collect();
            *seq = resolved;
        }
    }

    repair(&mut child, jobs, data);
    child
}
