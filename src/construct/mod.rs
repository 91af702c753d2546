//! Constructive initialization.
//!
//! Initial schedules come from an earliest-due-date allocation
//! ([`build_initial_schedule`]) followed by greedy setup-aware resequencing
//! of every machine queue ([`optimize_sequence_with_setup`]).
//! [`generate_optimized_population`] repeats both over shuffled job orders
//! to seed a diverse population.

mod allocation;
mod sequencing;

pub use allocation::build_initial_schedule;
pub use sequencing::optimize_sequence_with_setup;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use crate::model::{JobId, Population, ProductionData};

/// Builds up to `size` constructed and resequenced schedules.
///
/// The first individual uses `jobs` in the given order; each later one
/// shuffles the working job order further before allocation. An individual
/// that fails to build is logged and skipped, so the returned population
/// can be shorter than `size`.
pub fn generate_optimized_population<R: Rng>(
    jobs: &[JobId],
    data: &ProductionData,
    lookahead: usize,
    size: usize,
    rng: &mut R,
) -> Population {
    let mut order = jobs.to_vec();
    let mut population = Vec::with_capacity(size);

    for i in 0..size {
        if i > 0 {
            order.shuffle(rng);
        }
        match build_initial_schedule(&order, data, rng) {
            Ok(schedule) => {
                population.push(optimize_sequence_with_setup(&schedule, data, lookahead));
            }
            Err(err) => {
                warn!(individual = i, error = %err, "skipping population member");
            }
        }
    }

    population
}
