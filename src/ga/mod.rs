//! Genetic algorithm over schedule genomes.
//!
//! Every operator is a function over owned values: it takes a population
//! (or parents) plus index-aligned fitness and returns a new population.
//! Nothing here keeps state between generations; [`GaRunner`] owns the
//! population, the stagnation counter, the temperature and the RNG.
//!
//! # Operators
//!
//! - [`crossover`]: OX over a parent pool, PMX over parent pairs, and the
//!   shared validity [`repair`](crossover::repair)
//! - [`mutation`]: in-queue shuffle, swap, inversion and scramble
//! - [`Selection`]: roulette, inverse roulette, linear ranking, tournament
//! - [`Replacement`]: simple, annealing, hill climbing
//! - [`reactivate`]: partial restart after stagnation
//!
//! # Key Types
//!
//! - [`GaConfig`]: algorithm parameters, presets and validation
//! - [`GaRunner`]: executes the evolutionary loop
//! - [`GaResult`]: best schedule and per-generation statistics
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
mod cooling;
pub mod crossover;
pub mod mutation;
mod reactivation;
mod replacement;
mod runner;
mod selection;

pub use config::{CrossoverStrategy, GaConfig};
pub use cooling::CoolingSchedule;
pub use crossover::{ox_crossover, pmx_crossover, repair, repair_workcenter};
pub use mutation::{mutate, MutationOperator};
pub use reactivation::reactivate;
pub use replacement::{
    annealing_replacement, hill_climbing_replacement, simple_replacement, Replacement,
};
pub use runner::{GaResult, GaRunner, GenerationFitness, GenerationStats};
pub use selection::{Selection, DEFAULT_RANK_PRESSURE, DEFAULT_TOURNAMENT_SIZE};
