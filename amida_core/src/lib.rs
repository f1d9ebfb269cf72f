//! Amida Core - Ghost-Leg (Amidakuji) Lottery Engine
//!
//! A ghost-leg lottery pairs N participants with N results by dropping each
//! participant down a vertical track and following every horizontal rung it
//! meets. This crate provides:
//! 1. **Generation**: a random connector grid obeying the adjacency-exclusion
//!    rule (`grid`), and the traversal that turns it into a pairing (`lottery`)
//! 2. **Layout**: the pixel geometry of the diagram (`layout`)
//! 3. **Rendering**: text and SVG consumers of a finished draw (`render`)
//! 4. **Input**: the externally owned roster of entries (`validation`)
//! 5. **Fairness**: outcome histograms over many draws (`metrics`)
//!
//! The generator is a pure function of its inputs and an injected
//! `amida_env::RandomSource`; it never fails and never retains caller data.

pub mod config;
pub mod grid;
pub mod lottery;
pub mod layout;
pub mod render;
pub mod validation;
pub mod metrics;

// Re-export key types for convenience
pub use config::{LotteryConfig, LotteryError, MAX_HEIGHT};
pub use grid::{ConnectorGrid, GridError, LineRecord};
pub use lottery::{generate, replay, Advisory, Draw, ResultMapping};
pub use layout::{DiagramLayout, LayoutConfig, Segment};
pub use render::{SvgRenderer, TextRenderer};
pub use validation::{Entries, Roster, RosterError};
pub use metrics::PairingHistogram;
