//! Error handling for deploykit
//!
//! This module defines the top-level error type. Provider-specific errors
//! (`GoogleError`, `FastlyError`) live next to their clients and convert into
//! [`DeployError`] at the crate boundary.

use crate::core::gateway::fastly::FastlyError;
use crate::core::providers::google::GoogleError;
use thiserror::Error;

/// Result type alias for deploykit
pub type Result<T> = std::result::Result<T, DeployError>;

/// Main error type for deploykit
#[derive(Error, Debug)]
pub enum DeployError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Google Cloud Functions errors
    #[error(transparent)]
    Google(#[from] GoogleError),

    /// Fastly errors
    #[error(transparent)]
    Fastly(#[from] FastlyError),

    /// A deployment step failed for the named provider
    #[error("{provider} deployment failed: {source}")]
    Deployment {
        provider: &'static str,
        #[source]
        source: Box<DeployError>,
    },

    /// Post-deploy smoke test failed
    #[error("Deployment test failed: {0}")]
    TestFailed(String),
}

/// Helper functions for creating specific errors
impl DeployError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn test_failed<S: Into<String>>(message: S) -> Self {
        Self::TestFailed(message.into())
    }

    /// Wrap an error with the provider that was being deployed to
    pub fn deployment(provider: &'static str, source: impl Into<DeployError>) -> Self {
        Self::Deployment {
            provider,
            source: Box::new(source.into()),
        }
    }

    /// Walk through `Deployment` wrappers to the underlying error
    pub fn root(&self) -> &DeployError {
        match self {
            Self::Deployment { source, .. } => source.root(),
            other => other,
        }
    }
}
