//! GA evolutionary loop execution.
//!
//! [`GaRunner`] drives one run end to end:
//! construction → (evaluation → reactivation → selection → crossover →
//! mutation → offspring evaluation → replacement → cooling) per generation.
//!
//! The runner owns every piece of cross-generation state: the population
//! and its index-aligned fitness, the best schedule so far, the stagnation
//! counter, the annealing temperature and the RNG. Each stage is a pure
//! function over owned values.
//!
//! Cancellation and the wall-clock budget are checked between generations
//! only, so a generation is never partially applied.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::config::{CrossoverStrategy, GaConfig};
use super::crossover::{ox_crossover, pmx_crossover};
use super::mutation::mutate;
use super::reactivation::reactivate;
use crate::construct::generate_optimized_population;
use crate::error::{Result, ScheduleError};
use crate::evaluate::evaluate_population;
use crate::model::{JobId, Population, ProductionData, Schedule};
use crate::random::create_rng;

/// Per-generation statistics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    /// 1-based generation number.
    pub generation: usize,
    pub population_mean: f64,
    /// Population standard deviation of the fitness (diversity).
    pub population_std: f64,
    pub selected_mean: f64,
    pub offspring_mean: f64,
    pub best_so_far: f64,
    /// Wall-clock time since the run started.
    pub elapsed: Duration,
    /// Size of the population that parents were drawn from.
    pub population_size: usize,
    /// Whether the population was reactivated this generation.
    pub reactivated: bool,
}

/// Raw fitness values of one generation, handed to observers.
#[derive(Debug, Clone, Copy)]
pub struct GenerationFitness<'a> {
    pub population: &'a [f64],
    pub selected: &'a [f64],
    pub offspring: &'a [f64],
}

/// Result of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// The best schedule found during the entire run.
    pub best: Schedule,

    pub best_fitness: f64,

    /// Best fitness of the constructed initial population.
    pub initial_best_fitness: f64,

    /// Number of completed generations.
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Whether the wall-clock budget ran out.
    pub timed_out: bool,

    pub reactivations: usize,

    /// Population members that failed to build (initially or on
    /// reactivation).
    pub construction_skips: usize,

    pub history: Vec<GenerationStats>,

    /// Best fitness so far, after each generation.
    pub fitness_history: Vec<f64>,
}

impl GaResult {
    /// Average relative percentage improvement over the initial best:
    /// `(initial − best) / initial × 100`.
    ///
    /// `None` when the initial best is already 0.
    pub fn relative_improvement(&self) -> Option<f64> {
        if self.initial_best_fitness == 0.0 {
            None
        } else {
            Some((self.initial_best_fitness - self.best_fitness) / self.initial_best_fitness * 100.0)
        }
    }
}

/// Executes the GA evolutionary loop.
///
/// # Usage
///
/// ```ignore
/// let config = GaConfig::default().with_seed(42);
/// let result = GaRunner::run(&data, &config)?;
/// println!("best weighted tardiness: {}", result.best_fitness);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA over every job in `data`.
    pub fn run(data: &ProductionData, config: &GaConfig) -> Result<GaResult> {
        let jobs = data.job_ids();
        Self::run_with_cancel(data, &jobs, config, None)
    }

    /// Runs the GA over a job subset with an optional cancellation token.
    ///
    /// If `cancel` is set to `true`, the GA stops before the next
    /// generation and returns the best schedule found so far.
    pub fn run_with_cancel(
        data: &ProductionData,
        jobs: &[JobId],
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult> {
        Self::run_with_observer(data, jobs, config, cancel, |_, _| {})
    }

    /// Like [`run_with_cancel`](Self::run_with_cancel), calling `observer`
    /// after every completed generation.
    ///
    /// # Errors
    ///
    /// Invalid configuration, input errors for the job set, and an empty
    /// initial population are returned as errors. Everything else is logged
    /// and the run continues.
    pub fn run_with_observer<F>(
        data: &ProductionData,
        jobs: &[JobId],
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
        mut observer: F,
    ) -> Result<GaResult>
    where
        F: FnMut(&GenerationStats, GenerationFitness<'_>),
    {
        config.validate()?;
        if jobs.is_empty() {
            return Err(ScheduleError::MalformedTable("empty job set".into()));
        }
        data.validate_jobs(jobs)?;
        if let Some(job) = jobs.iter().find(|j| data.due_date(j).is_none()) {
            return Err(ScheduleError::MissingDueDate(job.clone()));
        }

        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };
        let start = Instant::now();
        let time_limit = config.time_limit_ms.map(Duration::from_millis);

        // 1. Construct and evaluate the initial population
        let mut population = generate_optimized_population(
            jobs,
            data,
            config.lookahead,
            config.population_size,
            &mut rng,
        );
        let mut construction_skips = config.population_size - population.len();
        let mut fitness = evaluate_population(&population, data, config.parallel);
        let Some(first) = best_index(&fitness) else {
            return Err(ScheduleError::EmptyPopulation);
        };
        info!(
            jobs = jobs.len(),
            population = population.len(),
            skipped = construction_skips,
            initial_best = fitness[first],
            "GA run started"
        );

        let initial_best_fitness = fitness[first];
        let mut best = population[first].clone();
        let mut best_fitness = initial_best_fitness;

        let mut temperature = config.initial_temperature;
        let mut stagnation = 0usize;
        let mut reactivations = 0usize;
        let mut cancelled = false;
        let mut timed_out = false;
        let mut history = Vec::with_capacity(config.max_generations);
        let mut fitness_history = Vec::with_capacity(config.max_generations);

        // 2. Evolutionary loop
        for gen in 0..config.max_generations {
            if cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                cancelled = true;
                break;
            }
            if time_limit.is_some_and(|limit| start.elapsed() >= limit) {
                timed_out = true;
                break;
            }
            if population.is_empty() {
                warn!(generation = gen + 1, "population is empty, stopping early");
                break;
            }

            // Best-so-far and stagnation
            if gen > 0 {
                if let Some(i) = best_index(&fitness) {
                    if fitness[i] < best_fitness {
                        let improvement = relative_gain(best_fitness, fitness[i]);
                        best = population[i].clone();
                        best_fitness = fitness[i];
                        if improvement >= config.convergence_threshold {
                            stagnation = 0;
                        } else {
                            stagnation += 1;
                        }
                    } else {
                        stagnation += 1;
                    }
                }
            }

            // Reactivation
            let mut reactivated = false;
            if let Some(fraction) = config.reactivation_fraction {
                if stagnation >= config.stagnation_limit {
                    let size = population.len();
                    population = reactivate(
                        &population,
                        &fitness,
                        fraction,
                        jobs,
                        data,
                        config.lookahead,
                        &mut rng,
                    );
                    construction_skips += size.saturating_sub(population.len());
                    fitness = evaluate_population(&population, data, config.parallel);
                    if let Some(i) = best_index(&fitness) {
                        if fitness[i] < best_fitness {
                            best = population[i].clone();
                            best_fitness = fitness[i];
                        }
                    }
                    stagnation = 0;
                    reactivations += 1;
                    reactivated = true;
                    if population.is_empty() {
                        warn!(generation = gen + 1, "reactivation produced no individuals, stopping early");
                        break;
                    }
                }
            }

            // Selection
            let k = config.parents_for(population.len());
            let picked = config.selection.select_indices(&fitness, k, &mut rng);
            let selected: Population = picked.iter().map(|&i| population[i].clone()).collect();
            let selected_fitness: Vec<f64> = picked.iter().map(|&i| fitness[i]).collect();

            // Crossover
            let offspring = match config.crossover {
                CrossoverStrategy::Ox { offspring } => ox_crossover(
                    &selected,
                    jobs,
                    data,
                    offspring.unwrap_or(population.len()),
                    &mut rng,
                ),
                CrossoverStrategy::Pmx { tuples } => {
                    let mut children = Vec::with_capacity(selected.len());
                    for pair in selected.chunks_exact(2) {
                        for _ in 0..2 {
                            children.push(pmx_crossover(
                                &pair[0], &pair[1], jobs, data, tuples, &mut rng,
                            ));
                        }
                    }
                    children
                }
            };

            // Mutation and offspring evaluation
            let offspring = mutate(&offspring, config.mutation_rate, &mut rng);
            let offspring_fitness = evaluate_population(&offspring, data, config.parallel);

            let stats = GenerationStats {
                generation: gen + 1,
                population_mean: mean(&fitness),
                population_std: std_dev(&fitness),
                selected_mean: mean(&selected_fitness),
                offspring_mean: mean(&offspring_fitness),
                best_so_far: best_fitness,
                elapsed: start.elapsed(),
                population_size: population.len(),
                reactivated,
            };
            observer(
                &stats,
                GenerationFitness {
                    population: &fitness,
                    selected: &selected_fitness,
                    offspring: &offspring_fitness,
                },
            );

            // Replacement and cooling
            let (next, next_fitness) = config.replacement.apply(
                &population,
                &fitness,
                &offspring,
                &offspring_fitness,
                temperature,
                &mut rng,
            );
            population = next;
            fitness = next_fitness;
            temperature = config.cooling.cool(
                temperature,
                config.initial_temperature,
                config.min_temperature,
                gen,
                config.max_generations,
            );

            debug!(
                generation = stats.generation,
                best = best_fitness,
                mean = stats.population_mean,
                std = stats.population_std,
                offspring = offspring.len(),
                temperature,
                "generation complete"
            );
            fitness_history.push(best_fitness);
            history.push(stats);
        }

        // Survivors of the last replacement
        if let Some(i) = best_index(&fitness) {
            if fitness[i] < best_fitness {
                best = population[i].clone();
                best_fitness = fitness[i];
            }
        }

        info!(
            generations = history.len(),
            best = best_fitness,
            initial_best = initial_best_fitness,
            reactivations,
            cancelled,
            timed_out,
            "GA run finished"
        );

        Ok(GaResult {
            best,
            best_fitness,
            initial_best_fitness,
            generations: history.len(),
            cancelled,
            timed_out,
            reactivations,
            construction_skips,
            history,
            fitness_history,
        })
    }
}

/// Index of the lowest fitness (first one on ties).
fn best_index(fitness: &[f64]) -> Option<usize> {
    fitness
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
}

/// `|old - new| / |old|`, infinite when `old` is 0 or not finite.
fn relative_gain(old: f64, new: f64) -> f64 {
    if old.is_finite() && old != 0.0 {
        (old - new).abs() / old.abs()
    } else {
        f64::INFINITY
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}

// ============================================================================
// Tests
// ============================================================================
