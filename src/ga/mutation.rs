//! Sequence mutation.
//!
//! Mutation reorders jobs within a machine queue and never moves a job to
//! another machine, so it cannot break schedule validity.
//!
//! # Operators
//!
//! - [`shuffle_mutation`]: random permutation of the whole queue
//! - [`swap_mutation`]: exchange two distinct positions
//! - [`invert_mutation`]: reverse a random segment (2-opt)
//! - [`scramble_mutation`]: shuffle a random segment
//!
//! # References
//!
//! - Cicirello (2023), "Genetic Operators for Permutation Representation"

use rand::seq::{index, SliceRandom};
use rand::Rng;

use crate::model::{Population, Schedule, StageKey};

/// A queue-level mutation operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOperator {
    Shuffle,
    Swap,
    Inversion,
    Scramble,
}

impl MutationOperator {
    pub const ALL: [MutationOperator; 4] = [
        MutationOperator::Shuffle,
        MutationOperator::Swap,
        MutationOperator::Inversion,
        MutationOperator::Scramble,
    ];

    /// Draws one operator uniformly.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Applies the operator. Sequences shorter than 2 are left untouched.
    pub fn apply<T, R: Rng>(self, seq: &mut [T], rng: &mut R) {
        match self {
            MutationOperator::Shuffle => shuffle_mutation(seq, rng),
            MutationOperator::Swap => swap_mutation(seq, rng),
            MutationOperator::Inversion => invert_mutation(seq, rng),
            MutationOperator::Scramble => scramble_mutation(seq, rng),
        }
    }
}

/// Mutates a copy of the population.
///
/// `max(1, round(rate × n))` distinct individuals are picked. For each, a
/// random number (1 to all) of its machine queues is picked, and each
/// picked queue of length ≥ 2 gets one uniformly chosen operator.
///
/// The input population is never modified.
pub fn mutate<R: Rng>(population: &[Schedule], rate: f64, rng: &mut R) -> Population {
    let mut mutated = population.to_vec();
    let n = mutated.len();
    if n == 0 {
        return mutated;
    }

    let count = ((rate * n as f64).round() as usize).clamp(1, n);
    for idx in index::sample(rng, n, count) {
        let individual = &mut mutated[idx];
        let keys: Vec<StageKey> = individual.keys().cloned().collect();
        if keys.is_empty() {
            continue;
        }
        let picks = rng.random_range(1..=keys.len());
        for k in index::sample(rng, keys.len(), picks) {
            let op = MutationOperator::random(rng);
            if let Some(seq) = individual.sequence_mut(&keys[k]) {
                op.apply(seq, rng);
            }
        }
    }

    mutated
}

/// Random permutation of the whole sequence.
pub fn shuffle_mutation<T, R: Rng>(seq: &mut [T], rng: &mut R) {
    if seq.len() < 2 {
        return;
    }
    seq.shuffle(rng);
}

/// Swap mutation: exchange two distinct random positions.
///
/// # Complexity
/// O(1)
pub fn swap_mutation<T, R: Rng>(seq: &mut [T], rng: &mut R) {
    if seq.len() < 2 {
        return;
    }
    let (i, j) = random_segment(seq.len(), rng);
    seq.swap(i, j);
}

/// Invert mutation: reverse a random segment (2-opt move).
///
/// # Complexity
/// O(n) worst case for segment reversal
pub fn invert_mutation<T, R: Rng>(seq: &mut [T], rng: &mut R) {
    if seq.len() < 2 {
        return;
    }
    let (start, end) = random_segment(seq.len(), rng);
    seq[start..=end].reverse();
}

/// Scramble mutation: shuffle a random segment.
pub fn scramble_mutation<T, R: Rng>(seq: &mut [T], rng: &mut R) {
    if seq.len() < 2 {
        return;
    }
    let (start, end) = random_segment(seq.len(), rng);
    seq[start..=end].shuffle(rng);
}

/// Pick two distinct positions `start < end` within `0..n` (requires n ≥ 2).
fn random_segment<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let picked = index::sample(rng, n, 2);
    let (a, b) = (picked.index(0), picked.index(1));
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}
