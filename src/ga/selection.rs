//! Parent selection.
//!
//! Every strategy takes index-aligned fitness values (lower = better) and
//! draws `k` parents with replacement, so duplicates are allowed.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Baker (1985), "Adaptive Selection Methods for Genetic Algorithms"

use rand::seq::index;
use rand::Rng;

use crate::model::Schedule;

/// Default tournament size.
pub const DEFAULT_TOURNAMENT_SIZE: usize = 7;

/// Default linear-ranking pressure.
pub const DEFAULT_RANK_PRESSURE: f64 = 1.8;

/// Selection strategy for choosing parents.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Fitness-proportionate: weight equals the raw fitness value.
    ///
    /// Under minimization this favors *worse* schedules. Falls back to
    /// uniform weights when the total is zero.
    Roulette,

    /// Fitness-proportionate on inverted fitness:
    /// `weight = max_fitness - fitness + ε`, so the best schedule gets the
    /// largest weight.
    InverseRoulette,

    /// Linear ranking with pressure `p` in `[1, 2]`.
    ///
    /// Rank `i` counted from the worst (0) to the best (n−1) gets weight
    /// `(2 − p) + 2(p − 1)·i/(n − 1)`. `p = 1` is uniform.
    Rank(f64),

    /// Tournament: sample `size` distinct competitors (capped at the
    /// population size) and keep the lowest fitness, or the highest when
    /// `maximize` is set.
    ///
    /// # Complexity
    /// O(size) per draw
    Tournament { size: usize, maximize: bool },
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament {
            size: DEFAULT_TOURNAMENT_SIZE,
            maximize: false,
        }
    }
}

impl Selection {
    /// Tournament that keeps the lowest fitness.
    pub fn tournament(size: usize) -> Self {
        Selection::Tournament {
            size,
            maximize: false,
        }
    }

    /// Draws `k` parent indices. An empty fitness slice yields no parents.
    pub fn select_indices<R: Rng>(&self, fitness: &[f64], k: usize, rng: &mut R) -> Vec<usize> {
        let n = fitness.len();
        if n == 0 {
            return Vec::new();
        }
        if n == 1 {
            return vec![0; k];
        }

        match *self {
            Selection::Roulette => {
                let weights: Vec<f64> = fitness.iter().map(|&f| f.max(0.0)).collect();
                sample_weighted(&weights, k, rng)
            }
            Selection::InverseRoulette => {
                let max = fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let epsilon = 1e-10;
                let weights: Vec<f64> = fitness
                    .iter()
                    .map(|&f| (max - f + epsilon).max(epsilon))
                    .collect();
                sample_weighted(&weights, k, rng)
            }
            Selection::Rank(pressure) => {
                // Worst first, so position i is the rank counted from the worst.
                let mut order: Vec<usize> = (0..n).collect();
                order.sort_by(|&a, &b| fitness[b].total_cmp(&fitness[a]));

                let p = pressure.clamp(1.0, 2.0);
                let weights: Vec<f64> = (0..n)
                    .map(|i| (2.0 - p) + 2.0 * (p - 1.0) * i as f64 / (n - 1) as f64)
                    .collect();
                sample_weighted(&weights, k, rng)
                    .into_iter()
                    .map(|pos| order[pos])
                    .collect()
            }
            Selection::Tournament { size, maximize } => {
                let size = size.clamp(1, n);
                (0..k)
                    .map(|_| {
                        let mut competitors = index::sample(rng, n, size).into_iter();
                        let mut best = competitors.next().unwrap_or(0);
                        for idx in competitors {
                            let better = if maximize {
                                fitness[idx] > fitness[best]
                            } else {
                                fitness[idx] < fitness[best]
                            };
                            if better {
                                best = idx;
                            }
                        }
                        best
                    })
                    .collect()
            }
        }
    }

    /// Draws `k` parents as owned copies.
    pub fn select<R: Rng>(
        &self,
        population: &[Schedule],
        fitness: &[f64],
        k: usize,
        rng: &mut R,
    ) -> Vec<Schedule> {
        debug_assert_eq!(population.len(), fitness.len());
        self.select_indices(fitness, k, rng)
            .into_iter()
            .map(|i| population[i].clone())
            .collect()
    }
}

/// Cumulative-threshold sampling with replacement. Uniform when the
/// weights sum to zero (or are not finite).
fn sample_weighted<R: Rng>(weights: &[f64], k: usize, rng: &mut R) -> Vec<usize> {
    let n = weights.len();
    let total: f64 = weights.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return (0..k).map(|_| rng.random_range(0..n)).collect();
    }

    (0..k)
        .map(|_| {
            let threshold = rng.random_range(0.0..total);
            let mut cumulative = 0.0;
            for (i, &w) in weights.iter().enumerate() {
                cumulative += w;
                if cumulative > threshold {
                    return i;
                }
            }
            n - 1 // floating-point fallback
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn counts(sel: Selection, fitness: &[f64], draws: usize, seed: u64) -> Vec<usize> {
        let mut rng = create_rng(seed);
        let mut counts = vec![0; fitness.len()];
        for i in sel.select_indices(fitness, draws, &mut rng) {
            counts[i] += 1;
        }
        counts
    }

    #[test]
    fn test_returns_k_indices() {
        let fitness = [3.0, 1.0, 2.0];
        let mut rng = create_rng(1);
        for sel in [
            Selection::Roulette,
            Selection::InverseRoulette,
            Selection::Rank(1.8),
            Selection::tournament(2),
        ] {
            let picked = sel.select_indices(&fitness, 10, &mut rng);
            assert_eq!(picked.len(), 10);
            assert!(picked.iter().all(|&i| i < 3));
        }
    }

    #[test]
    fn test_roulette_weights_by_raw_fitness() {
        let c = counts(Selection::Roulette, &[100.0, 1.0, 50.0], 10_000, 42);
        assert!(c[0] > c[2] && c[2] > c[1], "got {c:?}");
    }

    #[test]
    fn test_roulette_zero_total_is_uniform() {
        let c = counts(Selection::Roulette, &[0.0; 4], 10_000, 42);
        for &n in &c {
            assert!(n > 2000, "expected uniform, got {c:?}");
        }
    }

    #[test]
    fn test_inverse_roulette_favors_best() {
        let c = counts(Selection::InverseRoulette, &[100.0, 50.0, 1.0, 80.0], 10_000, 42);
        assert!(c[2] > c[1] && c[1] > c[3], "got {c:?}");
        assert_eq!(c.iter().sum::<usize>(), 10_000);
    }

    #[test]
    fn test_rank_favors_best() {
        let c = counts(Selection::Rank(1.8), &[100.0, 50.0, 1.0, 80.0], 10_000, 42);
        assert!(c[2] > c[1], "got {c:?}");
        assert!(c[1] > c[0], "got {c:?}");
    }

    #[test]
    fn test_rank_pressure_one_is_uniform() {
        let c = counts(Selection::Rank(1.0), &[9.0, 1.0, 5.0, 3.0], 10_000, 7);
        for &n in &c {
            assert!(n > 2000, "expected uniform, got {c:?}");
        }
    }

    #[test]
    fn test_rank_pressure_two_never_picks_worst() {
        let c = counts(Selection::Rank(2.0), &[9.0, 1.0, 5.0], 5_000, 7);
        assert_eq!(c[0], 0, "worst has weight 0, got {c:?}");
    }

    #[test]
    fn test_full_tournament_picks_extreme() {
        let fitness = [10.0, 5.0, 1.0, 8.0];
        let mut rng = create_rng(3);
        let min = Selection::tournament(4).select_indices(&fitness, 50, &mut rng);
        assert!(min.iter().all(|&i| i == 2));
        let max = Selection::Tournament {
            size: 10,
            maximize: true,
        }
        .select_indices(&fitness, 50, &mut rng);
        assert!(max.iter().all(|&i| i == 0));
    }

    #[test]
    fn test_tournament_size_one_is_random() {
        let c = counts(Selection::tournament(1), &[10.0, 5.0, 1.0, 8.0], 10_000, 42);
        for &n in &c {
            assert!(n > 1500, "expected uniform, got {c:?}");
        }
    }

    #[test]
    fn test_degenerate_populations() {
        let mut rng = create_rng(0);
        assert!(Selection::default().select_indices(&[], 5, &mut rng).is_empty());
        assert_eq!(
            Selection::Rank(1.5).select_indices(&[4.0], 3, &mut rng),
            vec![0, 0, 0]
        );
        assert!(Selection::Roulette.select_indices(&[1.0, 2.0], 0, &mut rng).is_empty());
    }

    #[test]
    fn test_select_clones_schedules() {
        use crate::fixtures::assembly_pair;
        use crate::construct::build_initial_schedule;

        let (data, jobs) = assembly_pair();
        let mut rng = create_rng(0);
        let s = build_initial_schedule(&jobs, &data, &mut rng).unwrap();
        let pop = vec![s.clone(), Schedule::new()];
        let picked = Selection::tournament(2).select(&pop, &[0.0, 5.0], 3, &mut rng);
        assert_eq!(picked, vec![s.clone(), s.clone(), s]);
    }
}
