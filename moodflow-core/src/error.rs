//! Error types for moodflow-core

use thiserror::Error;

/// Main error type for the moodflow-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or out-of-bounds input
    #[error("validation error: {0}")]
    Validation(String),

    /// Spreadsheet event-log read or append failed
    #[error("sheets error: {0}")]
    Sheets(String),

    /// Insight narrator call failed or returned unparseable content
    #[error("insight error: {0}")]
    Insight(String),

    /// Slide-deck rendering call failed
    #[error("slides error: {0}")]
    Slides(String),

    /// Collaborator call exceeded its configured timeout
    #[error("timeout: {0}")]
    Timeout(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for moodflow-core
pub type Result<T> = std::result::Result<T, Error>;
