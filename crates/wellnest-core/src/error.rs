//! Core error types for wellnest-core.
//!
//! Every fallible operation in the library reports one of the enums below.
//! `CoreError` is the umbrella type the CLI sees; the narrower enums are
//! returned directly where a caller can only hit one failure class.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for wellnest-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Sequencer command rejected
    #[error("Sequencer error: {0}")]
    Sequencer(#[from] SequencerError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejections raised by the phase sequencer.
///
/// Both are synchronous and leave the sequencer exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequencerError {
    /// The phase list cannot drive a sequencer (e.g. it is empty).
    #[error("Invalid sequence: {0}")]
    InvalidSequence(String),

    /// The requested order is not a permutation of the current phase ids.
    #[error("Invalid reorder: {0}")]
    InvalidReorder(String),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Could not resolve or create the data directory
    #[error("Data directory unavailable: {0}")]
    DataDir(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Stored value could not be decoded
    #[error("Corrupt value under key '{key}': {message}")]
    Corrupt { key: String, message: String },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Validation errors for tracker input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Empty text where content is required
    #[error("'{0}' must not be empty")]
    Empty(String),

    /// Number outside its accepted range
    #[error("Value {value} for '{field}' is out of range ({min}..={max})")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// No entry with this id
    #[error("No entry with id '{0}'")]
    NotFound(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _msg)
                if code.code == rusqlite::ErrorCode::DatabaseLocked =>
            {
                DatabaseError::Locked
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
