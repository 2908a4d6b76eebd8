//! Error types for rillchat

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`RillError`]
pub type Result<T> = std::result::Result<T, RillError>;

/// Main error type for rillchat
#[derive(Debug, Error)]
pub enum RillError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration parse error
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Unknown configuration key
    #[error("Unknown config key: {0}")]
    UnknownConfigKey(String),

    /// Serving endpoint returned a non-success status
    #[error("Endpoint error (HTTP {status}): {message}")]
    Endpoint { status: u16, message: String },

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Byte stream contained invalid UTF-8
    #[error("Invalid UTF-8 in response stream: {0}")]
    Decode(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl From<String> for RillError {
    fn from(s: String) -> Self {
        RillError::Other(s)
    }
}

impl From<&str> for RillError {
    fn from(s: &str) -> Self {
        RillError::Other(s.to_string())
    }
}
