//! Common error types for hitboard

use thiserror::Error;

/// Common result type for hitboard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across hitboard crates
///
/// Only ingestion-stage failures (`Io`, `Encoding`, `Malformed`) and startup
/// configuration failures are fatal. Row-level anomalies never surface here.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input bytes are not valid in the declared source encoding
    #[error("Encoding error at record {record}: {message}")]
    Encoding { record: u64, message: String },

    /// Structurally broken input (bad CSV framing, missing header)
    #[error("Malformed input: {0}")]
    Malformed(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid control value or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for errors caused by the caller rather than by the data or the host
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }
}
