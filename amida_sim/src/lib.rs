//! Amida Deterministic Audit Harness
//!
//! This crate wraps the lottery generator in a controlled environment where
//! every draw is reproducible from a single 64-bit seed.
//!
//! # Core Principle
//!
//! The generator's only source of non-determinism is its `RandomSource`.
//! Replace it with a seeded ChaCha stream (`SeededRandom`) or a fixed list
//! of values (`ScriptedRandom`) and any pairing can be replayed exactly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ScenarioRunner                         │
//! │                                                             │
//! │   master seed ──► derive_seed(i) ──► SeededRandom           │
//! │                                          │                  │
//! │                                     ┌────▼─────┐            │
//! │                                     │ generate │            │
//! │                                     └────┬─────┘            │
//! │                                          │ Draw             │
//! │                      ┌───────────────────┼──────────────┐   │
//! │                 ┌────▼────┐        ┌─────▼─────┐  ┌─────▼─┐ │
//! │                 │ Oracle  │        │ Histogram │  │Export │ │
//! │                 │(swaps)  │        │ (fairness)│  │ JSON  │ │
//! │                 └─────────┘        └───────────┘  └───────┘ │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use amida_sim::{ScenarioRunner, scenarios::ScenarioId};
//!
//! let runner = ScenarioRunner::new(42).with_trials(500);
//! let result = runner.run(ScenarioId::Bijection);
//! assert!(result.passed);
//! ```

mod context;
mod oracle;
mod seeds;
mod runner;
mod exporter;
mod visualizer;
pub mod scenarios;

pub use context::{ScriptedRandom, SeededRandom};
pub use oracle::{Discrepancy, Oracle};
pub use seeds::{derive_seed, parameter_seed};
pub use runner::{labels, ScenarioMetrics, ScenarioResult, ScenarioRunner};
pub use exporter::{ExportError, LotteryExport};
pub use visualizer::RerunLogger;
