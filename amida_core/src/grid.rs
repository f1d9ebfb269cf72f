//! Connector Grid - the occupancy structure behind a ghost-leg draw
//! ==================================================================
//!
//! The grid holds one boolean per (level, column) slot, where column `c`
//! joins tracks `c` and `c + 1`. With N tracks there are N - 1 columns.
//!
//! ```text
//!   track:  0   1   2   3
//! level 0   |---|   |---|      connectors at (0,0) and (0,2)
//! level 1   |   |---|   |      connector at (1,1)
//! level 2   |   |   |   |
//! ```
//!
//! Invariant: no two connectors on the same level share a track, i.e.
//! (level, c) and (level, c + 1) are never both set. Generation enforces it
//! by checking only the left neighbour, which is sufficient because columns
//! are filled left to right.

use crate::config::MAX_HEIGHT;
use amida_env::RandomSource;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One realized connector: tracks `column` and `column + 1` are joined
/// at `level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineRecord {
    pub level: usize,
    pub column: usize,
}

impl LineRecord {
    pub fn new(level: usize, column: usize) -> Self {
        Self { level, column }
    }
}

/// Errors raised when building a grid from explicit line records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// The record lies outside the grid
    #[error("Connector at level {level}, column {column} is outside the grid")]
    OutOfBounds { level: usize, column: usize },

    /// The record would share a track with a neighbouring connector
    #[error("Connector at level {level}, column {column} touches an adjacent connector")]
    AdjacentConnectors { level: usize, column: usize },
}

// =============================================================================
// CONNECTOR GRID
// =============================================================================

/// Occupancy grid of horizontal connectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorGrid {
    tracks: usize,
    height: usize,
    /// Row-major: `cells[level * columns + column]`
    cells: Vec<bool>,
}

impl ConnectorGrid {
    /// Creates an empty grid for `tracks` vertical lines and `height` levels.
    ///
    /// `height` is clamped to [`MAX_HEIGHT`], and further if the cell count
    /// would not fit in `usize`.
    pub fn new(tracks: usize, height: usize) -> Self {
        let columns = tracks.saturating_sub(1);
        let mut height = height.min(MAX_HEIGHT);
        if columns > 0 && columns.checked_mul(height).is_none() {
            height = usize::MAX / columns;
        }
        Self {
            tracks,
            height,
            cells: vec![false; columns * height],
        }
    }

    /// Populates a grid at random.
    ///
    /// Slots are visited level by level, left to right. A slot is eligible
    /// only when the slot to its left on the same level is empty; each
    /// eligible slot consumes exactly one draw and becomes a connector when
    /// the draw is below `density`. Ineligible slots consume nothing.
    pub fn generate<R: RandomSource + ?Sized>(
        tracks: usize,
        height: usize,
        density: f64,
        rng: &mut R,
    ) -> Self {
        let mut grid = Self::new(tracks, height);
        let columns = grid.columns();

        for level in 0..height {
            for column in 0..columns {
                if column > 0 && grid.has_connector(level, column - 1) {
                    continue;
                }
                if rng.next_uniform() < density {
                    let idx = grid.index(level, column);
                    grid.cells[idx] = true;
                }
            }
        }

        grid
    }

    /// Rebuilds a grid from explicit records, rejecting any record that is
    /// out of bounds or would break the adjacency invariant.
    pub fn from_lines(tracks: usize, height: usize, lines: &[LineRecord]) -> Result<Self, GridError> {
        let mut grid = Self::new(tracks, height);
        for line in lines {
            grid.insert(*line)?;
        }
        Ok(grid)
    }

    /// Places a single connector.
    pub fn insert(&mut self, line: LineRecord) -> Result<(), GridError> {
        let LineRecord { level, column } = line;
        if level >= self.height || column >= self.columns() {
            return Err(GridError::OutOfBounds { level, column });
        }
        let left = column > 0 && self.has_connector(level, column - 1);
        let right = self.has_connector(level, column + 1);
        if left || right {
            return Err(GridError::AdjacentConnectors { level, column });
        }
        let idx = self.index(level, column);
        self.cells[idx] = true;
        Ok(())
    }

    /// Number of vertical tracks.
    pub fn tracks(&self) -> usize {
        self.tracks
    }

    /// Number of levels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of connector columns (tracks - 1, or 0).
    pub fn columns(&self) -> usize {
        self.tracks.saturating_sub(1)
    }

    /// Returns true if a connector joins `column` and `column + 1` at `level`.
    ///
    /// Out-of-range coordinates are simply empty.
    pub fn has_connector(&self, level: usize, column: usize) -> bool {
        level < self.height && column < self.columns() && self.cells[self.index(level, column)]
    }

    /// All realized connectors in level-major, then column order.
    pub fn lines(&self) -> Vec<LineRecord> {
        let columns = self.columns();
        (0..self.height)
            .flat_map(|level| (0..columns).map(move |column| LineRecord::new(level, column)))
            .filter(|line| self.has_connector(line.level, line.column))
            .collect()
    }

    /// Number of realized connectors.
    pub fn connector_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Follows one track from the top to the bottom and returns where it ends.
    ///
    /// At each level the walker prefers a connector on its left, then one on
    /// its right; the invariant guarantees at most one of them exists.
    pub fn descend(&self, start: usize) -> usize {
        let mut track = start;
        for level in 0..self.height {
            if track > 0 && self.has_connector(level, track - 1) {
                track -= 1;
            } else if track + 1 < self.tracks && self.has_connector(level, track) {
                track += 1;
            }
        }
        track
    }

    /// Destination track for every start track.
    pub fn permutation(&self) -> Vec<usize> {
        (0..self.tracks).map(|start| self.descend(start)).collect()
    }

    /// Checks the adjacency-exclusion invariant over the whole grid.
    pub fn is_well_formed(&self) -> bool {
        (0..self.height).all(|level| {
            (1..self.columns()).all(|column| {
                !(self.has_connector(level, column - 1) && self.has_connector(level, column))
            })
        })
    }

    fn index(&self, level: usize, column: usize) -> usize {
        level * self.columns() + column
    }
}

// =============================================================================
// TESTS
// =============================================================================
