//! Error types and handling for Porssi
//!
//! This module defines the error types used throughout the application.
//! Per-slot fetch failures (`Network`, `InvalidResponse`, `Decode`) are
//! produced by the price client and absorbed at the price source boundary;
//! the rest surface from configuration, logging and the web server.

use thiserror::Error;

/// Result type alias for Porssi operations
pub type Result<T> = std::result::Result<T, PorssiError>;

/// Main error type for Porssi
#[derive(Debug, Error)]
pub enum PorssiError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Transport-level failures talking to the price API
    #[error("Network error: {message}")]
    Network { message: String },

    /// Non-success status or missing body from the price API
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    /// Body did not carry a numeric `price` field
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// HTTP/Web server errors
    #[error("Web server error: {message}")]
    Web { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// Generic errors with context
    #[error("Error: {message}")]
    Generic { message: String },
}

impl PorssiError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new invalid-response error
    pub fn invalid_response<S: Into<String>>(message: S) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Create a new decode error
    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a new web error
    pub fn web<S: Into<String>>(message: S) -> Self {
        Self::Web {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Create a new generic error
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// True for the three failure kinds a single price fetch can produce
    pub const fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::InvalidResponse { .. } | Self::Decode { .. }
        )
    }
}

impl From<std::io::Error> for PorssiError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for PorssiError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PorssiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for PorssiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::decode(err.to_string())
        } else if err.is_status() {
            Self::invalid_response(err.to_string())
        } else {
            Self::network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = PorssiError::config("test config error");
        assert!(matches!(err, PorssiError::Config { .. }));

        let err = PorssiError::decode("missing price");
        assert!(matches!(err, PorssiError::Decode { .. }));

        let err = PorssiError::validation("field", "test validation error");
        assert!(matches!(err, PorssiError::Validation { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = PorssiError::config("test error");
        assert_eq!(format!("{}", err), "Configuration error: test error");

        let err = PorssiError::validation("test_field", "invalid value");
        assert_eq!(
            format!("{}", err),
            "Validation error: test_field - invalid value"
        );
    }

    #[test]
    fn fetch_failure_kinds() {
        assert!(PorssiError::network("x").is_fetch_failure());
        assert!(PorssiError::invalid_response("x").is_fetch_failure());
        assert!(PorssiError::decode("x").is_fetch_failure());
        assert!(!PorssiError::config("x").is_fetch_failure());
    }
}
