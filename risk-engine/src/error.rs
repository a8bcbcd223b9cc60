//! Error types for risk engine

use thiserror::Error;

/// Risk engine error
///
/// Scoring itself is infallible; only loading scoring tables can fail.
#[derive(Debug, Error)]
pub enum Error {
    /// Could not read a tables file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tables file is not valid TOML for the expected shape
    #[error("Configuration error: {0}")]
    Config(String),

    /// Tables parsed but violate a scoring invariant
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
