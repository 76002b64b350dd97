//! Environment variable overrides
//!
//! Every setting can be overridden with a `DEPLOYKIT_*` variable. Function
//! environment parameters use `DEPLOYKIT_PARAM_<NAME>=value`.

use super::{Config, LogFormat};
use crate::utils::error::{DeployError, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

const PREFIX: &str = "DEPLOYKIT_";
const PARAM_PREFIX: &str = "DEPLOYKIT_PARAM_";

/// Snapshot of the `DEPLOYKIT_*` variables
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    vars: HashMap<String, String>,
}

impl EnvOverrides {
    /// Capture overrides from the process environment (and `.env`, if present)
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {:?}", path);
        }
        Self::from_pairs(std::env::vars())
    }

    /// Capture overrides from explicit key/value pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| k.starts_with(PREFIX))
            .collect();
        Self { vars }
    }

    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(&format!("{}{}", PREFIX, key)).cloned()
    }

    /// Apply the captured overrides onto `config`
    pub fn apply(&self, config: &mut Config) -> Result<()> {
        // Function
        if let Some(name) = self.get("FUNCTION_NAME") {
            config.function.name = name;
        }
        if let Some(package) = self.get("PACKAGE_NAME") {
            config.function.package_name = package;
        }
        if let Some(version) = self.get("FUNCTION_VERSION") {
            config.function.version = version;
        }
        if let Some(memory) = self.get("FUNCTION_MEMORY") {
            config.function.memory = memory
                .parse()
                .map_err(|e| DeployError::config(format!("Invalid function memory: {}", e)))?;
        }
        if let Some(node_version) = self.get("NODE_VERSION") {
            config.function.node_version = node_version;
        }
        if let Some(archive) = self.get("ARCHIVE") {
            config.function.archive = Some(PathBuf::from(archive));
        }
        if let Some(test_path) = self.get("TEST_PATH") {
            config.function.test_path = test_path;
        }
        for (key, value) in &self.vars {
            if let Some(param) = key.strip_prefix(PARAM_PREFIX) {
                if !param.is_empty() {
                    config.function.params.insert(param.to_string(), value.clone());
                }
            }
        }

        // Google
        if let Some(email) = self.get("GOOGLE_EMAIL") {
            config.google.email = Some(email);
        }
        if let Some(key_file) = self.get("GOOGLE_KEY_FILE") {
            config.google.key_file = Some(PathBuf::from(key_file));
        }
        if let Some(project_id) = self.get("GOOGLE_PROJECT_ID") {
            config.google.project_id = Some(project_id);
        }
        if let Some(region) = self.get("GOOGLE_REGION") {
            config.google.region = region;
        }
        if let Some(token) = self.get("GOOGLE_ACCESS_TOKEN") {
            config.google.access_token = Some(token);
        }

        // Fastly
        if let Some(auth) = self.get("FASTLY_AUTH") {
            config.fastly.auth = Some(auth);
        }
        if let Some(service_id) = self.get("FASTLY_SERVICE_ID") {
            config.fastly.service_id = Some(service_id);
        }
        if let Some(checkpath) = self.get("FASTLY_CHECKPATH") {
            config.fastly.checkpath = checkpath;
        }

        // HTTP
        if let Some(timeout) = self.get("HTTP_TIMEOUT") {
            config.http.timeout_seconds = timeout
                .parse()
                .map_err(|e| DeployError::config(format!("Invalid HTTP timeout: {}", e)))?;
        }

        // Logging
        if let Some(level) = self.get("LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(format) = self.get("LOG_FORMAT") {
            config.logging.format = match format.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "text" => LogFormat::Text,
                other => {
                    return Err(DeployError::config(format!("Invalid log format: {}", other)));
                }
            };
        }

        debug!("Applied {} environment overrides", self.vars.len());
        Ok(())
    }
}
