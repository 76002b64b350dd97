//! Google Cloud Functions error types

use super::types::{ErrorEnvelope, Status};
use serde_json::Value;
use thiserror::Error;

/// Diagnostic details attached to a provider error
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDetails {
    /// Symbolic status such as `PERMISSION_DENIED`
    pub status: Option<String>,
    /// Raw `google.rpc` detail messages
    pub details: Vec<Value>,
}

impl ErrorDetails {
    fn from_status(status: &Status) -> Option<Self> {
        if status.status.is_none() && status.details.is_empty() {
            None
        } else {
            Some(Self {
                status: status.status.clone(),
                details: status.details.clone(),
            })
        }
    }
}

/// Google specific errors
#[derive(Error, Debug)]
pub enum GoogleError {
    /// Authentication error
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// API error with status code
    #[error("API error (status {status_code}): {message}")]
    Api {
        status_code: u16,
        message: String,
        details: Option<ErrorDetails>,
    },

    /// Long-running operation finished with an error
    #[error("Operation {name} failed (code {code}): {message}")]
    Operation {
        name: String,
        code: i32,
        message: String,
        details: Option<ErrorDetails>,
    },

    /// Long-running operation did not finish in time
    #[error("Operation {name} did not complete within {seconds} seconds")]
    OperationTimeout { name: String, seconds: u64 },

    /// Archive upload rejected by the signed URL
    #[error("Upload failed (status {status_code}): {message}")]
    Upload { status_code: u16, message: String },

    /// Response parsing error
    #[error("Failed to parse response: {0}")]
    ResponseParsing(String),
}

impl From<serde_json::Error> for GoogleError {
    fn from(err: serde_json::Error) -> Self {
        Self::ResponseParsing(err.to_string())
    }
}

impl From<reqwest::Error> for GoogleError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl GoogleError {
    /// Build an error from a non-success HTTP response
    pub fn from_response(status_code: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => Self::Api {
                status_code,
                message: envelope.error.message.clone(),
                details: ErrorDetails::from_status(&envelope.error),
            },
            Err(_) => Self::Api {
                status_code,
                message: body.trim().to_string(),
                details: None,
            },
        }
    }

    /// Build an error from a finished operation's `error` field
    pub fn from_operation(name: &str, status: &Status) -> Self {
        Self::Operation {
            name: name.to_string(),
            code: status.code,
            message: status.message.clone(),
            details: ErrorDetails::from_status(status),
        }
    }

    /// Diagnostic details, when the provider supplied any
    pub fn details(&self) -> Option<&ErrorDetails> {
        match self {
            Self::Api { details, .. } | Self::Operation { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    /// Get the HTTP status code if applicable
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } | Self::Upload { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Whether the provider reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
            || self
                .details()
                .and_then(|d| d.status.as_deref())
                .is_some_and(|s| s == "NOT_FOUND")
    }
}
