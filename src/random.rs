//! Seeded random number generation.
//!
//! Every randomized operation takes `&mut R where R: Rng`; this module only
//! fixes the concrete generator the driver and tests use.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// The generator used by [`GaRunner`](crate::ga::GaRunner).
pub type DefaultRng = StdRng;

/// Creates a reproducible generator from a seed.
pub fn create_rng(seed: u64) -> DefaultRng {
    StdRng::seed_from_u64(seed)
}
