//! Logging setup
//!
//! Installs the global `tracing` subscriber used by the `deploykit` binary.

use crate::config::{LogFormat, LoggingConfig};
use crate::utils::error::{DeployError, Result};
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| DeployError::config(format!("Invalid log level: {}", e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };

    installed.map_err(|e| DeployError::config(format!("Failed to initialize logging: {}", e)))
}

/// Shorten a secret so it can appear in log lines
pub fn mask_secret(secret: &str) -> String {
    if secret.chars().count() > 8 {
        let prefix: String = secret.chars().take(4).collect();
        format!("{}...", prefix)
    } else {
        "***".to_string()
    }
}
