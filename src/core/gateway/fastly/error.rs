//! Fastly API error types

use serde::Deserialize;
use thiserror::Error;

/// Fastly gateway errors
#[derive(Debug, Error)]
pub enum FastlyError {
    /// Non-success response from the Fastly API
    #[error("Fastly API error (status {status_code}): {message}")]
    Api { status_code: u16, message: String },

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Response parsing error
    #[error("Failed to parse response: {0}")]
    ResponseParsing(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Gateway is missing auth, service, checkpath or backends
    #[error("Fastly gateway is not ready: {0}")]
    NotReady(String),

    /// The service has no version that could be cloned
    #[error("Service {0} has no version to clone")]
    NoActiveVersion(String),
}

/// Error body returned by the Fastly API
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    msg: String,
    #[serde(default)]
    detail: Option<String>,
}

impl From<reqwest::Error> for FastlyError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for FastlyError {
    fn from(err: serde_json::Error) -> Self {
        Self::ResponseParsing(err.to_string())
    }
}

impl FastlyError {
    /// Build an error from a non-success HTTP response
    pub fn from_response(status_code: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(ErrorBody { msg, detail: Some(detail) }) if !detail.is_empty() => {
                format!("{}: {}", msg, detail)
            }
            Ok(ErrorBody { msg, .. }) if !msg.is_empty() => msg,
            _ => body.trim().to_string(),
        };
        Self::Api { status_code, message }
    }

    /// Get the HTTP status code if applicable
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Whether the resource being created already exists
    pub fn is_conflict(&self) -> bool {
        self.status_code() == Some(409)
    }
}
