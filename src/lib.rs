//! Multi-stage production scheduling with a genetic algorithm.
//!
//! Jobs flow through a fixed four-stage pipeline (PLASTIC → SMT → PTH →
//! ASSEMBLY) of parallel, non-identical machines with eligibility rules,
//! per-machine processing times and sequence-dependent setups. The crate
//! searches for the machine assignment and queue order that minimize the
//! weighted tardiness of ASSEMBLY completions.
//!
//! - [`model`]: identifiers, static tables ([`ProductionData`](model::ProductionData))
//!   and the schedule genome
//! - [`construct`]: earliest-due-date allocation and setup-aware resequencing
//! - [`evaluate`]: pipeline simulation and weighted-tardiness fitness
//! - [`ga`]: crossover with repair, mutation, selection, replacement,
//!   reactivation and the [`GaRunner`](ga::GaRunner) driver
//!
//! # Example
//!
//! ```
//! use u_stageflow::ga::{GaConfig, GaRunner};
//! use u_stageflow::model::{EligibilityRule, Job, JobId, ProductionData, StageKey, Workcenter};
//!
//! let mut data = ProductionData::new();
//! data.add_machine(Workcenter::Assembly, "L1", 2)?;
//! data.add_machine(Workcenter::Assembly, "L2", 1)?;
//! for (id, due) in [("A", 3.0), ("B", 1.0), ("C", 2.0)] {
//!     data.add_job(Job::new(id, due))?;
//!     let job = JobId::from(id);
//!     data.apply_eligibility_rule(&job, Workcenter::Assembly, &EligibilityRule::Preferential)?;
//!     for m in ["L1", "L2"] {
//!         data.set_processing_hours(&job, &StageKey::new(Workcenter::Assembly, m), 7.5)?;
//!     }
//! }
//!
//! let config = GaConfig::fast()
//!     .with_population_size(20)
//!     .with_max_generations(5)
//!     .with_seed(7);
//! let result = GaRunner::run(&data, &config)?;
//! assert!(result.best_fitness <= result.initial_best_fitness);
//! # Ok::<(), u_stageflow::error::ScheduleError>(())
//! ```

pub mod construct;
pub mod error;
pub mod evaluate;
pub mod ga;
pub mod model;
pub mod random;

#[cfg(test)]
mod fixtures;
