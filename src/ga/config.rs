//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

use super::cooling::CoolingSchedule;
use super::replacement::Replacement;
use super::selection::{Selection, DEFAULT_RANK_PRESSURE};
use crate::error::{Result, ScheduleError};

/// Crossover operator and its size parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CrossoverStrategy {
    /// Order-based crossover over the whole parent pool.
    ///
    /// `offspring` children per generation; `None` means one per member of
    /// the current population.
    Ox { offspring: Option<usize> },

    /// Partially-mapped crossover over consecutive parent pairs, two
    /// children per pair, splicing up to `tuples` machine queues each.
    Pmx { tuples: usize },
}

impl Default for CrossoverStrategy {
    fn default() -> Self {
        CrossoverStrategy::Ox { offspring: None }
    }
}

/// Configuration for the genetic algorithm.
///
/// # Defaults
///
/// ```
/// use u_stageflow::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.max_generations, 500);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_stageflow::ga::{GaConfig, Replacement, Selection};
///
/// let config = GaConfig::default()
///     .with_population_size(60)
///     .with_selection(Selection::Rank(1.8))
///     .with_replacement(Replacement::Annealing { elite: 5 })
///     .with_mutation_rate(0.05);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of constructed individuals in the initial population.
    pub population_size: usize,

    /// Maximum number of generations.
    pub max_generations: usize,

    /// Parent selection strategy.
    pub selection: Selection,

    /// Parents drawn per generation. `None` draws one per individual.
    pub selection_count: Option<usize>,

    pub crossover: CrossoverStrategy,

    /// Fraction of offspring that get mutated (at least one always is).
    pub mutation_rate: f64,

    pub replacement: Replacement,

    /// Starting temperature for annealing replacement.
    pub initial_temperature: f64,

    /// Temperature floor.
    pub min_temperature: f64,

    pub cooling: CoolingSchedule,

    /// Generations without significant improvement before reactivation.
    pub stagnation_limit: usize,

    /// Share of the population rebuilt on reactivation. `None` disables
    /// reactivation.
    pub reactivation_fraction: Option<f64>,

    /// Minimum relative improvement `|old - new| / |old|` that resets the
    /// stagnation counter. 0.0 counts any improvement.
    pub convergence_threshold: f64,

    /// Candidate window of the setup-aware resequencing used during
    /// construction and reactivation.
    pub lookahead: usize,

    /// Whether to evaluate batches in parallel using rayon.
    pub parallel: bool,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,

    /// Optional wall-clock time limit in milliseconds, checked between
    /// generations.
    pub time_limit_ms: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 500,
            selection: Selection::default(),
            selection_count: None,
            crossover: CrossoverStrategy::default(),
            mutation_rate: 0.02,
            replacement: Replacement::default(),
            initial_temperature: 100.0,
            min_temperature: 1e-3,
            cooling: CoolingSchedule::default(),
            stagnation_limit: 10,
            reactivation_fraction: Some(0.3),
            convergence_threshold: 0.0,
            lookahead: 5,
            parallel: true,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    /// Equivalent to `.with_selection(Selection::tournament(k))`.
    pub fn with_tournament_size(self, k: usize) -> Self {
        self.with_selection(Selection::tournament(k))
    }

    /// Linear ranking with the default pressure.
    pub fn with_rank_selection(self) -> Self {
        self.with_selection(Selection::Rank(DEFAULT_RANK_PRESSURE))
    }

    pub fn with_selection_count(mut self, k: usize) -> Self {
        self.selection_count = Some(k);
        self
    }

    pub fn with_crossover(mut self, crossover: CrossoverStrategy) -> Self {
        self.crossover = crossover;
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_replacement(mut self, replacement: Replacement) -> Self {
        self.replacement = replacement;
        self
    }

    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Enables reactivation with the given fraction.
    pub fn with_reactivation(mut self, fraction: f64) -> Self {
        self.reactivation_fraction = Some(fraction);
        self
    }

    pub fn without_reactivation(mut self) -> Self {
        self.reactivation_fraction = None;
        self
    }

    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold.max(0.0);
        self
    }

    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Quick runs on small job sets.
    ///
    /// - Population: 50, Generations: 100, Time limit: 10s
    pub fn fast() -> Self {
        Self {
            population_size: 50,
            max_generations: 100,
            time_limit_ms: Some(10_000),
            ..Self::default()
        }
    }

    /// - Population: 100, Generations: 300, Time limit: 60s
    pub fn balanced() -> Self {
        Self {
            population_size: 100,
            max_generations: 300,
            time_limit_ms: Some(60_000),
            ..Self::default()
        }
    }

    /// Long runs on large job sets.
    ///
    /// - Population: 150, Generations: 500, Time limit: 1h
    /// - Stagnation limit: 20
    pub fn quality() -> Self {
        Self {
            population_size: 150,
            max_generations: 500,
            stagnation_limit: 20,
            time_limit_ms: Some(3_600_000),
            ..Self::default()
        }
    }

    /// Picks a preset from the number of jobs in the run.
    ///
    /// - `job_count < 50` → [`fast()`](Self::fast)
    /// - `50 ≤ job_count < 200` → [`balanced()`](Self::balanced)
    /// - `job_count ≥ 200` → [`quality()`](Self::quality)
    pub fn auto_select(job_count: usize) -> Self {
        if job_count < 50 {
            Self::fast()
        } else if job_count < 200 {
            Self::balanced()
        } else {
            Self::quality()
        }
    }

    /// Parents drawn per generation for a population of `n`.
    pub fn parents_for(&self, n: usize) -> usize {
        self.selection_count.unwrap_or(n)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(ScheduleError::InvalidConfig(msg));

        if self.population_size < 2 {
            return fail("population_size must be at least 2".into());
        }
        if self.max_generations == 0 {
            return fail("max_generations must be at least 1".into());
        }
        match self.selection {
            Selection::Rank(p) if !(1.0..=2.0).contains(&p) => {
                return fail(format!("rank pressure must be in [1, 2], got {p}"));
            }
            Selection::Tournament { size: 0, .. } => {
                return fail("tournament size must be at least 1".into());
            }
            _ => {}
        }
        if self.selection_count == Some(0) {
            return fail("selection_count must be positive or None".into());
        }
        match self.crossover {
            CrossoverStrategy::Ox { offspring: Some(0) } => {
                return fail("OX offspring count must be positive or None".into());
            }
            CrossoverStrategy::Pmx { tuples: 0 } => {
                return fail("PMX tuple count must be at least 1".into());
            }
            _ => {}
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return fail(format!("mutation_rate must be in [0, 1], got {}", self.mutation_rate));
        }
        if self.replacement.elite() >= self.population_size {
            return fail("elite count fills the entire population".into());
        }
        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return fail("initial_temperature must be positive".into());
        }
        if !(self.min_temperature >= 0.0 && self.min_temperature <= self.initial_temperature) {
            return fail("min_temperature must be in [0, initial_temperature]".into());
        }
        self.cooling.validate().map_err(ScheduleError::InvalidConfig)?;
        if let Some(f) = self.reactivation_fraction {
            if !(f > 0.0 && f <= 1.0) {
                return fail(format!("reactivation_fraction must be in (0, 1], got {f}"));
            }
            if self.stagnation_limit == 0 {
                return fail("stagnation_limit must be at least 1 when reactivation is on".into());
            }
        }
        if self.convergence_threshold < 0.0 {
            return fail("convergence_threshold must be non-negative".into());
        }
        if self.time_limit_ms == Some(0) {
            return fail("time_limit_ms must be positive or None".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.population_size, 100);
        assert_eq!(config.selection, Selection::tournament(7));
        assert_eq!(config.crossover, CrossoverStrategy::Ox { offspring: None });
        assert_eq!(config.replacement, Replacement::HillClimbing { elite: 10 });
        assert!((config.mutation_rate - 0.02).abs() < 1e-12);
        assert_eq!(config.stagnation_limit, 10);
        assert_eq!(config.reactivation_fraction, Some(0.3));
        assert_eq!(config.lookahead, 5);
        assert!((config.initial_temperature - 100.0).abs() < 1e-12);
        assert!(config.parallel);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GaConfig::default()
            .with_population_size(40)
            .with_max_generations(20)
            .with_rank_selection()
            .with_selection_count(20)
            .with_crossover(CrossoverStrategy::Pmx { tuples: 3 })
            .with_mutation_rate(2.0)
            .with_replacement(Replacement::Simple)
            .without_reactivation()
            .with_lookahead(2)
            .with_parallel(false)
            .with_seed(42);

        assert_eq!(config.selection, Selection::Rank(1.8));
        assert_eq!(config.parents_for(40), 20);
        assert!((config.mutation_rate - 1.0).abs() < 1e-12);
        assert!(config.reactivation_fraction.is_none());
        assert_eq!(config.seed, Some(42));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parents_default_to_population() {
        assert_eq!(GaConfig::default().parents_for(37), 37);
    }

    #[test]
    fn test_validate_rejects() {
        let bad = [
            GaConfig::default().with_population_size(1),
            GaConfig::default().with_max_generations(0),
            GaConfig::default().with_selection(Selection::Rank(2.5)),
            GaConfig::default().with_tournament_size(0),
            GaConfig::default().with_selection_count(0),
            GaConfig::default().with_crossover(CrossoverStrategy::Ox { offspring: Some(0) }),
            GaConfig::default().with_crossover(CrossoverStrategy::Pmx { tuples: 0 }),
            GaConfig::default()
                .with_population_size(10)
                .with_replacement(Replacement::Annealing { elite: 10 }),
            GaConfig::default().with_initial_temperature(0.0),
            GaConfig::default().with_min_temperature(500.0),
            GaConfig::default().with_cooling(CoolingSchedule::Geometric { alpha: 1.5 }),
            GaConfig::default().with_reactivation(0.0),
            GaConfig::default().with_stagnation_limit(0),
            GaConfig::default().with_time_limit_ms(0),
        ];
        for config in bad {
            let err = config.validate().unwrap_err();
            assert!(matches!(err, ScheduleError::InvalidConfig(_)), "{config:?}");
        }
    }

    #[test]
    fn test_stagnation_zero_allowed_without_reactivation() {
        let config = GaConfig::default()
            .without_reactivation()
            .with_stagnation_limit(0);
        assert!(config.validate().is_ok());
    }

    // ---- Presets ----

    #[test]
    fn test_presets_validate() {
        for config in [GaConfig::fast(), GaConfig::balanced(), GaConfig::quality()] {
            assert!(config.validate().is_ok());
            assert!(config.time_limit_ms.is_some());
        }
    }

    #[test]
    fn test_auto_select_boundaries() {
        assert_eq!(GaConfig::auto_select(49).population_size, 50);
        assert_eq!(GaConfig::auto_select(50).population_size, 100);
        assert_eq!(GaConfig::auto_select(199).max_generations, 300);
        assert_eq!(GaConfig::auto_select(200).population_size, 150);
    }
}
