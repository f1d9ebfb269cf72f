//! JSON exporter for lottery runs.
//!
//! Exports a finished draw together with everything needed to replay it:
//! the seed, the configuration and both input lists.

use amida_core::{replay, Draw, GridError, LotteryConfig};
use amida_env::RunId;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors while writing, reading or replaying an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The exported lines do not form a valid grid
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),
}

/// Complete lottery export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotteryExport {
    /// Run identifier
    pub run_id: RunId,

    /// Seed used (0 when drawn from unseeded entropy)
    pub seed: u64,

    pub config: LotteryConfig,

    /// Inputs as handed to the generator
    pub participants: Vec<String>,
    pub results: Vec<String>,

    /// Lines, mapping and advisories
    #[serde(flatten)]
    pub draw: Draw,
}

impl LotteryExport {
    /// Creates a new export container.
    pub fn new(
        run_id: RunId,
        seed: u64,
        config: LotteryConfig,
        participants: Vec<String>,
        results: Vec<String>,
        draw: Draw,
    ) -> Self {
        Self {
            run_id,
            seed,
            config,
            participants,
            results,
            draw,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let json = self.to_json()?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Reads an export back from disk.
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }

    /// Recomputes the mapping from the exported lines.
    pub fn replay(&self) -> Result<Draw, ExportError> {
        Ok(replay(
            &self.participants,
            &self.results,
            self.draw.height,
            &self.draw.lines,
        )?)
    }

    /// True when replaying the lines reproduces the recorded mapping.
    pub fn verify(&self) -> Result<bool, ExportError> {
        Ok(self.replay()?.mapping == self.draw.mapping)
    }
}
