//! Production implementation of RandomSource using the thread-local RNG.

use crate::{EnvError, RandomSource};
use rand::rngs::{OsRng, ThreadRng};
use rand::{Rng, RngCore};

/// Production source backed by `rand::thread_rng()`.
///
/// This is the "real" implementation used for interactive draws.
/// It is not reproducible; use a seeded source when a run must be replayed.
pub struct ThreadRandom {
    rng: ThreadRng,
}

impl ThreadRandom {
    /// Creates a new ThreadRandom.
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for ThreadRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for ThreadRandom {
    fn next_uniform(&mut self) -> f64 {
        // `gen::<f64>()` samples the half-open interval [0, 1)
        self.rng.gen::<f64>()
    }
}

/// Reads a fresh 64-bit seed from the operating system.
///
/// Used when the caller asks for a reproducible run without naming a seed:
/// the seed is logged so the run can be replayed later.
pub fn entropy_seed() -> Result<u64, EnvError> {
    let mut bytes = [0u8; 8];
    OsRng.try_fill_bytes(&mut bytes).map_err(EnvError::entropy)?;
    Ok(u64::from_le_bytes(bytes))
}
