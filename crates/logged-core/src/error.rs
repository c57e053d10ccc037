//! Error types for Logged

use thiserror::Error;

/// Main error type for logging operations
#[derive(Error, Debug)]
pub enum LogError {
    /// The sink rejected a write or flush (broken pipe, disk full, ...)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration value could not be understood
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type alias using LogError
pub type LogResult<T> = Result<T, LogError>;
