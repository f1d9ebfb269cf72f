//! Amida Environment Abstraction Layer
//!
//! This crate isolates every source of non-determinism the lottery touches,
//! so the same generator runs against **Production** entropy (`ThreadRandom`)
//! and against seeded or scripted sources in the audit harness.
//!
//! # Core Concept
//!
//! The generator never calls a global RNG. It receives a `RandomSource`
//! and pulls uniform draws from it, one per eligible connector slot:
//! - Production: `rand::thread_rng()`
//! - Audit: `ChaCha8Rng` seeded from a single `u64`
//! - Unit tests: a fixed script of draws
//!
//! Because all entropy flows through one trait, any surprising pairing is
//! reproducible from its seed.
//!
//! # Example
//!
//! ```ignore
//! use amida_env::{RandomSource, ThreadRandom};
//!
//! fn coin<R: RandomSource + ?Sized>(rng: &mut R) -> bool {
//!     rng.next_uniform() < 0.5
//! }
//!
//! let mut rng = ThreadRandom::new();
//! let heads = coin(&mut rng);
//! ```

mod random;
mod types;
mod error;
mod thread_impl;

pub use random::RandomSource;
pub use types::RunId;
pub use error::EnvError;
pub use thread_impl::{entropy_seed, ThreadRandom};
