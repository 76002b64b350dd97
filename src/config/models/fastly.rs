//! Fastly gateway configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Fastly service the gateway is written into
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FastlyConfig {
    /// Fastly API token
    #[serde(default, skip_serializing)]
    pub auth: Option<String>,
    /// Fastly service ID
    #[serde(default)]
    pub service_id: Option<String>,
    /// Health check path appended to every backend's base path
    #[serde(default = "default_checkpath")]
    pub checkpath: String,
    /// Fastly API base URL
    #[serde(default = "default_fastly_api_base")]
    pub api_base: String,
}

impl Default for FastlyConfig {
    fn default() -> Self {
        Self {
            auth: None,
            service_id: None,
            checkpath: default_checkpath(),
            api_base: default_fastly_api_base(),
        }
    }
}

impl FastlyConfig {
    /// Whether the gateway should be configured at all
    pub fn is_configured(&self) -> bool {
        self.auth.as_deref().is_some_and(|s| !s.is_empty())
            && self.service_id.as_deref().is_some_and(|s| !s.is_empty())
    }
}
