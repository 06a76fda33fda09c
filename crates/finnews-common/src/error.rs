//! Error types shared across finnews crates

use thiserror::Error;

/// Result type alias for finnews operations
pub type Result<T> = std::result::Result<T, FinnewsError>;

/// Main error type for finnews
#[derive(Error, Debug)]
pub enum FinnewsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl FinnewsError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
