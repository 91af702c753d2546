//! Population reactivation after stagnation.

use rand::Rng;
use tracing::info;

use super::replacement::ranked;
use crate::construct::generate_optimized_population;
use crate::model::{JobId, Population, ProductionData, Schedule};

/// Keeps the best `round((1 − fraction) × size)` schedules and refills the
/// rest with freshly constructed ones built from `seed_jobs`.
///
/// Construction failures are skipped, so the result can be shorter than the
/// input. Fitness of the returned population must be recomputed.
pub fn reactivate<R: Rng>(
    population: &[Schedule],
    fitness: &[f64],
    fraction: f64,
    seed_jobs: &[JobId],
    data: &ProductionData,
    lookahead: usize,
    rng: &mut R,
) -> Population {
    let size = population.len();
    let keep = (((1.0 - fraction.clamp(0.0, 1.0)) * size as f64).round() as usize).min(size);

    let mut next: Population = ranked(fitness)
        .into_iter()
        .take(keep)
        .map(|i| population[i].clone())
        .collect();
    let fresh = generate_optimized_population(seed_jobs, data, lookahead, size - keep, rng);
    info!(kept = keep, fresh = fresh.len(), "population reactivated");
    next.extend(fresh);
    next
}
