//! Error types for the telemetry seeder

use thiserror::Error;

/// Seeder errors
#[derive(Debug, Error)]
pub enum SeederError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Endpoint resolution failed: {0}")]
    Resolve(String),

    #[error("Publish rejected: {status} - {body}")]
    Publish { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Timestamp out of range: {0}")]
    TimestampOutOfRange(String),
}

/// Result type for seeder operations
pub type Result<T> = std::result::Result<T, SeederError>;

impl From<serde_yaml::Error> for SeederError {
    fn from(e: serde_yaml::Error) -> Self {
        SeederError::Config(e.to_string())
    }
}
