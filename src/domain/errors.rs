use std::path::PathBuf;
use thiserror::Error;

/// Every way a collection run can fail.
///
/// All variants end up in the same place: the message text of a single
/// error event on stdout and exit code 1. The variants exist for logging and
/// tests, not for the output schema.
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("{0}")]
    Config(String),

    #[error("Failed to read settings from {}: {error}", path.display())]
    Settings { path: PathBuf, error: std::io::Error },

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("HTTP {status} {reason} for url: {url}")]
    Http {
        status: u16,
        reason: String,
        url: String,
    },

    #[error("Invalid JSON in response from {url}: {error}")]
    Payload {
        url: String,
        error: serde_json::Error,
    },

    #[error("Unexpected response shape: {0}")]
    Shape(String),

    #[error("Failed to encode event: {0}")]
    Encode(String),
}

// Variants carry their cause in the message and expose no `source()`.
impl From<serde_json::Error> for CollectorError {
    fn from(error: serde_json::Error) -> Self {
        Self::Encode(error.to_string())
    }
}

impl CollectorError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn shape(message: impl Into<String>) -> Self {
        Self::Shape(message.into())
    }
}
