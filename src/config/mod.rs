//! Configuration management for deploykit
//!
//! Configuration is read from a YAML file, then overridden from environment
//! variables, then from command-line flags, and finally validated.

pub mod loader;
pub mod models;
pub mod validation;

pub use loader::EnvOverrides;
pub use models::*;
pub use validation::Validate;

use crate::utils::error::{DeployError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// The function being deployed
    #[serde(default)]
    pub function: FunctionConfig,
    /// Google Cloud Functions target
    #[serde(default)]
    pub google: GoogleConfig,
    /// Fastly gateway
    #[serde(default)]
    pub fastly: FastlyConfig,
    /// Shared HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file and validate it
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Self::read_file(path).await?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an optional file and apply environment overrides.
    ///
    /// The result is not validated; callers validate once their own overrides
    /// are in place.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::read_file(path).await?,
            None => Self::default(),
        };

        EnvOverrides::from_env().apply(&mut config)?;
        Ok(config)
    }

    async fn read_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DeployError::config(format!("Failed to read config file: {}", e)))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| DeployError::config(format!("Failed to parse config: {}", e)))?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.function
            .validate()
            .map_err(|e| DeployError::config(format!("Function config error: {}", e)))?;
        self.google
            .validate()
            .map_err(|e| DeployError::config(format!("Google config error: {}", e)))?;
        self.fastly
            .validate()
            .map_err(|e| DeployError::config(format!("Fastly config error: {}", e)))?;
        self.http
            .validate()
            .map_err(|e| DeployError::config(format!("HTTP config error: {}", e)))?;
        self.logging
            .validate()
            .map_err(|e| DeployError::config(format!("Logging config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| DeployError::config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
