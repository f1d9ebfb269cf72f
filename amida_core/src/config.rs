//! Lottery configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of horizontal levels in the grid.
pub const DEFAULT_HEIGHT: usize = 10;

/// Default probability that an eligible slot receives a connector.
pub const DEFAULT_DENSITY: f64 = 0.3;

/// Largest number of levels a grid will hold; taller requests are clamped.
pub const MAX_HEIGHT: usize = 10_000;

/// Errors raised when checking a configuration up front.
///
/// The generator itself never returns these; it clamps instead.
#[derive(Debug, Error, PartialEq)]
pub enum LotteryError {
    /// Density must be a finite probability in [0, 1]
    #[error("Invalid connector density {0}: expected a value in [0, 1]")]
    InvalidDensity(f64),

    /// Height above [`MAX_HEIGHT`]
    #[error("Height {0} exceeds the maximum of {max}", max = MAX_HEIGHT)]
    HeightTooLarge(usize),
}

/// Configuration for a lottery draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LotteryConfig {
    /// Number of horizontal levels (default: 10)
    pub height: usize,
    
    /// Connector probability per eligible slot (default: 0.3)
    pub density: f64,
}

impl Default for LotteryConfig {
    fn default() -> Self {
        Self {
            height: DEFAULT_HEIGHT,
            density: DEFAULT_DENSITY,
        }
    }
}

impl LotteryConfig {
    /// Sets the number of levels.
    pub fn with_height(mut self, height: usize) -> Self {
        self.height = height;
        self
    }
    
    /// Sets the connector density.
    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }
    
    /// Checks that the density is a usable probability and the height fits.
    pub fn validate(&self) -> Result<(), LotteryError> {
        if !(self.density.is_finite() && (0.0..=1.0).contains(&self.density)) {
            return Err(LotteryError::InvalidDensity(self.density));
        }
        if self.height > MAX_HEIGHT {
            return Err(LotteryError::HeightTooLarge(self.height));
        }
        Ok(())
    }

    /// Height clamped to [`MAX_HEIGHT`].
    pub fn effective_height(&self) -> usize {
        self.height.min(MAX_HEIGHT)
    }
    
    /// Density clamped into [0, 1]; NaN counts as 0.
    pub fn effective_density(&self) -> f64 {
        if self.density.is_nan() {
            0.0
        } else {
            self.density.clamp(0.0, 1.0)
        }
    }
}
