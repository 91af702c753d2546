//! Fitness evaluation.
//!
//! A schedule is scored by simulating it ([`simulate`]) and summing the
//! weighted tardiness of its ASSEMBLY completions. Lower is better; the
//! value is never negative.
//!
//! Batch evaluation ([`evaluate_population`]) returns fitness values
//! index-aligned with the population. With the `parallel` feature it fans
//! out over rayon's pool; each schedule writes only its own slot.

mod simulation;

pub use simulation::{simulate, ScheduledOperation, Simulation};

use crate::model::{ProductionData, Schedule};

/// Weighted tardiness of a schedule at the ASSEMBLY stage.
pub fn fitness(schedule: &Schedule, data: &ProductionData) -> f64 {
    simulate(schedule, data).weighted_tardiness(data)
}

/// Evaluates every schedule, preserving order.
pub fn evaluate_population(
    population: &[Schedule],
    data: &ProductionData,
    parallel: bool,
) -> Vec<f64> {
    #[cfg(feature = "parallel")]
    {
        if parallel {
            use rayon::prelude::*;
            return population.par_iter().map(|s| fitness(s, data)).collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    population.iter().map(|s| fitness(s, data)).collect()
}
