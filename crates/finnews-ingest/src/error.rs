//! Error types for finnews ingestion

use finnews_common::FinnewsError;
use thiserror::Error;

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Errors that abort an ingestion batch.
///
/// Per-document problems (malformed lines, invalid documents, duplicate urls)
/// are counted, never raised.
#[derive(Error, Debug)]
pub enum IngestError {
    /// SQLite failure unrelated to the url uniqueness constraint
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Reading the input failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input file does not exist
    #[error("Input file not found: '{0}'")]
    InputNotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Common(#[from] FinnewsError),
}

impl IngestError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
