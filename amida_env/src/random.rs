//! Randomness source trait for the lottery generator.

/// The single interface through which the generator consumes entropy.
///
/// # Implementations
///
/// - **Production**: `ThreadRandom` - wraps `rand::thread_rng()`
/// - **Audit**: `SeededRandom` - wraps `ChaCha8Rng::seed_from_u64(seed)`
/// - **Tests**: `ScriptedRandom` - replays a fixed list of draws
///
/// # Determinism
///
/// Two runs that observe the same sequence of `next_uniform()` values
/// produce the same connector grid. The generator draws exactly once per
/// eligible (level, column) slot, in level-major order.
pub trait RandomSource {
    /// Returns the next uniform draw in `[0, 1)`.
    fn next_uniform(&mut self) -> f64;
    
    /// Returns the source's seed (for logging/debugging).
    ///
    /// Unseeded sources return 0.
    fn seed(&self) -> u64 {
        0
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }
    
    fn seed(&self) -> u64 {
        (**self).seed()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }
    
    fn seed(&self) -> u64 {
        (**self).seed()
    }
}
