// src/error.rs

//! Unified error handling for the instructor directory client.

use std::fmt;

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request could not complete
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("HTTP {status} from {path}")]
    Status { path: String, status: u16 },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Backend record without a usable identifier
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Client-side input validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Wizard transition not allowed from the current step
    #[error("Transition rejected: {0}")]
    Transition(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a malformed record error.
    pub fn malformed(message: impl fmt::Display) -> Self {
        Self::MalformedRecord(message.to_string())
    }

    /// Create a rejected transition error.
    pub fn transition(message: impl Into<String>) -> Self {
        Self::Transition(message.into())
    }

    /// Create a status error for a request path.
    pub fn status(path: impl Into<String>, status: u16) -> Self {
        Self::Status {
            path: path.into(),
            status,
        }
    }

    /// Whether the error came from the network layer.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_classification() {
        assert!(AppError::status("instructors/search", 502).is_network());
        assert!(!AppError::validation("empty comment").is_network());
        assert!(!AppError::malformed("missing id").is_network());
    }

    #[test]
    fn test_status_display() {
        let err = AppError::status("instructors/top3", 500);
        assert_eq!(err.to_string(), "HTTP 500 from instructors/top3");
    }
}
