//! Error types for the Amida environment abstraction.

use thiserror::Error;

/// Errors that can occur in the environment abstraction layer.
#[derive(Debug, Error)]
pub enum EnvError {
    /// The operating system entropy pool could not be read
    #[error("Entropy error: {0}")]
    Entropy(String),
    
    /// A scripted source was asked for more draws than it holds
    #[error("Random script exhausted after {0} draws")]
    Exhausted(usize),
}

impl EnvError {
    /// Creates an entropy error.
    pub fn entropy(msg: impl std::fmt::Display) -> Self {
        Self::Entropy(msg.to_string())
    }
}
