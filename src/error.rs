//! Error types for keycolval
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using KcvError
pub type Result<T> = std::result::Result<T, KcvError>;

/// Unified error type for keycolval operations
#[derive(Debug, Error)]
pub enum KcvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Column not found: {key}/{column}")]
    ColumnNotFound { key: String, column: String },

    #[error("Invalid slice: start {start:?} is greater than end {end:?}")]
    InvalidSlice { start: String, end: String },

    // -------------------------------------------------------------------------
    // Operation Log Errors
    // -------------------------------------------------------------------------
    #[error("Unknown operation in log: {name:?}")]
    UnknownOperation { name: String },

    #[error("Malformed log record: {0}")]
    MalformedRecord(String),

    #[error("Log replay failed at line {line}: {source}")]
    ReplayFailed {
        line: u64,
        #[source]
        source: Box<KcvError>,
    },

    #[error("Argument cannot be written to the log: {0:?}")]
    UnloggableArgument(String),

    #[error("No operation log attached to this store")]
    LogNotAttached,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
