//! Generational replacement.
//!
//! Every strategy takes the current population and the offspring with
//! their index-aligned fitness values and returns the next population
//! together with its fitness, so the survivors never need re-evaluation.
//!
//! Annealing and hill climbing pair parent `i` with child `i`, keep the
//! best `elite` parents verbatim in front, and truncate to the original
//! size. Simple replacement keeps the better half of each group, so its
//! output size follows the input sizes.

use rand::Rng;

use crate::model::{Population, Schedule};

/// Replacement strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Replacement {
    /// Better half of the parents plus better half of the offspring.
    Simple,
    /// Per-index Metropolis acceptance with elitism.
    Annealing { elite: usize },
    /// Per-index acceptance of non-worsening children with elitism.
    HillClimbing { elite: usize },
}

impl Default for Replacement {
    fn default() -> Self {
        Replacement::HillClimbing { elite: 10 }
    }
}

impl Replacement {
    /// Number of protected elites (0 for simple replacement).
    pub fn elite(&self) -> usize {
        match *self {
            Replacement::Simple => 0,
            Replacement::Annealing { elite } | Replacement::HillClimbing { elite } => elite,
        }
    }

    /// Applies the strategy. `temperature` is only read by annealing.
    pub fn apply<R: Rng>(
        &self,
        population: &[Schedule],
        fitness: &[f64],
        offspring: &[Schedule],
        offspring_fitness: &[f64],
        temperature: f64,
        rng: &mut R,
    ) -> (Population, Vec<f64>) {
        match *self {
            Replacement::Simple => {
                simple_replacement(population, fitness, offspring, offspring_fitness)
            }
            Replacement::Annealing { elite } => annealing_replacement(
                population,
                fitness,
                offspring,
                offspring_fitness,
                temperature,
                elite,
                rng,
            ),
            Replacement::HillClimbing { elite } => {
                hill_climbing_replacement(population, fitness, offspring, offspring_fitness, elite)
            }
        }
    }
}

/// Better `⌊|pop|/2⌋` parents followed by the better `⌊|offspring|/2⌋`
/// children.
pub fn simple_replacement(
    population: &[Schedule],
    fitness: &[f64],
    offspring: &[Schedule],
    offspring_fitness: &[f64],
) -> (Population, Vec<f64>) {
    let mut next = Vec::with_capacity(population.len() / 2 + offspring.len() / 2);
    let mut next_fitness = Vec::with_capacity(next.capacity());

    for (group, group_fitness) in [(population, fitness), (offspring, offspring_fitness)] {
        for i in ranked(group_fitness).into_iter().take(group.len() / 2) {
            next.push(group[i].clone());
            next_fitness.push(group_fitness[i]);
        }
    }

    (next, next_fitness)
}

/// Metropolis acceptance per index with `n_elite` protected parents.
///
/// A strictly better child always replaces its parent; otherwise it is
/// accepted with probability `exp(-(child - parent) / temperature)`. At a
/// non-positive temperature only non-worsening children are accepted.
/// Parents without a paired child are kept.
pub fn annealing_replacement<R: Rng>(
    population: &[Schedule],
    fitness: &[f64],
    offspring: &[Schedule],
    offspring_fitness: &[f64],
    temperature: f64,
    n_elite: usize,
    rng: &mut R,
) -> (Population, Vec<f64>) {
    elitist_merge(population, fitness, offspring, offspring_fitness, n_elite, |parent, child| {
        if child < parent {
            true
        } else if temperature > 0.0 {
            rng.random::<f64>() < (-(child - parent) / temperature).exp()
        } else {
            child <= parent
        }
    })
}

/// Accepts a child iff it is no worse than its parent, with `n_elite`
/// protected parents.
pub fn hill_climbing_replacement(
    population: &[Schedule],
    fitness: &[f64],
    offspring: &[Schedule],
    offspring_fitness: &[f64],
    n_elite: usize,
) -> (Population, Vec<f64>) {
    elitist_merge(population, fitness, offspring, offspring_fitness, n_elite, |parent, child| {
        child <= parent
    })
}

fn elitist_merge<F>(
    population: &[Schedule],
    fitness: &[f64],
    offspring: &[Schedule],
    offspring_fitness: &[f64],
    n_elite: usize,
    mut accept: F,
) -> (Population, Vec<f64>)
where
    F: FnMut(f64, f64) -> bool,
{
    let n = population.len();
    let mut next: Population = Vec::with_capacity(n + n_elite);
    let mut next_fitness = Vec::with_capacity(n + n_elite);

    for i in ranked(fitness).into_iter().take(n_elite.min(n)) {
        next.push(population[i].clone());
        next_fitness.push(fitness[i]);
    }

    for i in 0..n {
        let child = offspring.get(i).zip(offspring_fitness.get(i));
        match child {
            Some((c, &cf)) if accept(fitness[i], cf) => {
                next.push(c.clone());
                next_fitness.push(cf);
            }
            _ => {
                next.push(population[i].clone());
                next_fitness.push(fitness[i]);
            }
        }
    }

    next.truncate(n);
    next_fitness.truncate(n);
    (next, next_fitness)
}

/// Indices sorted by ascending fitness; ties keep index order.
pub(crate) fn ranked(fitness: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..fitness.len()).collect();
    order.sort_by(|&a, &b| fitness[a].total_cmp(&fitness[b]));
    order
}
