//! Amida Metrics Module
//! ====================
//!
//! Outcome statistics across many draws. A ghost-leg lottery is a
//! permutation, but not a uniformly random one: with few levels a
//! participant is far more likely to land near its own track. The
//! histogram quantifies that bias:
//! - **Counts**: how often start track `s` ended on destination `d`
//! - **Chi-squared**: deviation of all counts from the uniform expectation
//! - **Max deviation**: worst relative over/under-representation of a cell

use crate::lottery::Draw;
use serde::{Deserialize, Serialize};

/// Start × destination outcome counts for a fixed track count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairingHistogram {
    tracks: usize,
    trials: u64,
    /// Row-major: `counts[start * tracks + destination]`
    counts: Vec<u64>,
}

impl PairingHistogram {
    pub fn new(tracks: usize) -> Self {
        Self {
            tracks,
            trials: 0,
            counts: vec![0; tracks * tracks],
        }
    }

    /// Adds one draw. Draws for a different track count are ignored.
    pub fn record(&mut self, draw: &Draw) -> bool {
        if draw.tracks != self.tracks || draw.mapping.len() != self.tracks {
            return false;
        }
        for m in &draw.mapping {
            if m.start < self.tracks && m.destination < self.tracks {
                self.counts[m.start * self.tracks + m.destination] += 1;
            }
        }
        self.trials += 1;
        true
    }

    pub fn tracks(&self) -> usize {
        self.tracks
    }

    /// Number of draws recorded.
    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn count(&self, start: usize, destination: usize) -> u64 {
        if start < self.tracks && destination < self.tracks {
            self.counts[start * self.tracks + destination]
        } else {
            0
        }
    }

    /// Expected count per cell under a uniform permutation.
    pub fn expected(&self) -> f64 {
        if self.tracks == 0 {
            0.0
        } else {
            self.trials as f64 / self.tracks as f64
        }
    }

    /// Observed frequency of `start -> destination`.
    pub fn probability(&self, start: usize, destination: usize) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.count(start, destination) as f64 / self.trials as f64
        }
    }

    /// Pearson chi-squared statistic against the uniform expectation.
    ///
    /// Each row is an independent multinomial with `tracks - 1` degrees of
    /// freedom; the statistic sums over all rows.
    pub fn chi_squared(&self) -> f64 {
        let expected = self.expected();
        if expected == 0.0 {
            return 0.0;
        }
        self.counts
            .iter()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum()
    }

    /// Largest `|observed / expected - 1|` over all cells.
    pub fn max_deviation(&self) -> f64 {
        let expected = self.expected();
        if expected == 0.0 {
            return 0.0;
        }
        self.counts
            .iter()
            .map(|&observed| (observed as f64 / expected - 1.0).abs())
            .fold(0.0, f64::max)
    }

    /// Probability that a participant keeps its own track.
    pub fn fixed_point_rate(&self) -> f64 {
        if self.trials == 0 || self.tracks == 0 {
            return 0.0;
        }
        let diagonal: u64 = (0..self.tracks).map(|t| self.count(t, t)).sum();
        diagonal as f64 / (self.trials as f64 * self.tracks as f64)
    }
}
