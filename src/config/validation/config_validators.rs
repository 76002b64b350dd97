//! Configuration validators
//!
//! This module provides `Validate` implementations for the function, Google,
//! Fastly, HTTP and logging configuration sections.

use super::trait_def::Validate;
use crate::config::models::*;
use crate::core::providers::google::naming::full_function_name;
use tracing::debug;
use url::Url;

/// Memory sizes accepted by Cloud Functions (1st gen)
pub(crate) const ALLOWED_MEMORY_MB: [u32; 7] = [128, 256, 512, 1024, 2048, 4096, 8192];

impl Validate for FunctionConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating function configuration");

        if self.name.is_empty() {
            return Err("Function name cannot be empty".to_string());
        }
        if self.package_name.is_empty() {
            return Err("Package name cannot be empty".to_string());
        }

        let combined = format!("{}{}", self.package_name, self.name);
        if combined.matches('@').count() > 1 {
            return Err(format!(
                "Package and function name may contain at most one '@', got {}--{}",
                self.package_name, self.name
            ));
        }

        let derived = full_function_name(&self.package_name, &self.name);
        if let Some(c) = derived
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(format!(
                "Function name {} contains unsupported character '{}'",
                derived, c
            ));
        }

        if !ALLOWED_MEMORY_MB.contains(&self.memory) {
            return Err(format!(
                "Memory must be one of {:?} MB, got {}",
                ALLOWED_MEMORY_MB, self.memory
            ));
        }

        if self.node_version.is_empty() || !self.node_version.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!(
                "Node version must be a major version number, got '{}'",
                self.node_version
            ));
        }

        if !self.test_path.is_empty() && !self.test_path.starts_with('/') {
            return Err("Test path must start with '/'".to_string());
        }

        Ok(())
    }
}

impl Validate for GoogleConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating Google configuration");

        if self.region.is_empty() {
            return Err("Google region cannot be empty".to_string());
        }

        validate_http_url(&self.api_base, "Google API base")?;
        if let Some(ref token_uri) = self.token_uri {
            validate_http_url(token_uri, "Google token URI")?;
        }

        if self.operation_poll_seconds == 0 {
            return Err("Operation poll interval must be greater than 0".to_string());
        }
        if self.operation_timeout_seconds < self.operation_poll_seconds {
            return Err("Operation timeout must not be shorter than the poll interval".to_string());
        }

        Ok(())
    }
}

impl Validate for FastlyConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating Fastly configuration");

        if !self.checkpath.starts_with('/') {
            return Err(format!(
                "Fastly checkpath must start with '/', got '{}'",
                self.checkpath
            ));
        }

        validate_http_url(&self.api_base, "Fastly API base")
    }
}

impl Validate for HttpConfig {
    fn validate(&self) -> Result<(), String> {
        if self.timeout_seconds == 0 {
            return Err("HTTP timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        tracing_subscriber::EnvFilter::try_new(&self.level)
            .map(|_| ())
            .map_err(|e| format!("Invalid log level '{}': {}", self.level, e))
    }
}

fn validate_http_url(value: &str, context: &str) -> Result<(), String> {
    let url = Url::parse(value).map_err(|e| format!("{} has invalid URL format: {}", context, e))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(format!(
            "{} must use http:// or https:// scheme, got: {}",
            context, scheme
        )),
    }
}
