//! Google Cloud Functions target configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Credentials and placement for the Google target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// Service account email
    #[serde(default)]
    pub email: Option<String>,
    /// Service account JSON key file, relative to the working directory
    #[serde(default)]
    pub key_file: Option<PathBuf>,
    /// Google Cloud project ID
    #[serde(default)]
    pub project_id: Option<String>,
    /// Region the function is deployed to
    #[serde(default = "default_region")]
    pub region: String,
    /// Pre-issued OAuth2 access token, used instead of the key file
    #[serde(default, skip_serializing)]
    pub access_token: Option<String>,
    /// Cloud Functions API base URL
    #[serde(default = "default_google_api_base")]
    pub api_base: String,
    /// OAuth2 token endpoint override (defaults to the key file's `token_uri`)
    #[serde(default)]
    pub token_uri: Option<String>,
    /// Seconds between long-running operation polls
    #[serde(default = "default_operation_poll_seconds")]
    pub operation_poll_seconds: u64,
    /// Maximum seconds to wait for a long-running operation
    #[serde(default = "default_operation_timeout_seconds")]
    pub operation_timeout_seconds: u64,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            email: None,
            key_file: None,
            project_id: None,
            region: default_region(),
            access_token: None,
            api_base: default_google_api_base(),
            token_uri: None,
            operation_poll_seconds: default_operation_poll_seconds(),
            operation_timeout_seconds: default_operation_timeout_seconds(),
        }
    }
}

impl GoogleConfig {
    /// Whether enough credentials are present to build a client
    pub fn has_credentials(&self) -> bool {
        let has = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        has(&self.email)
            && has(&self.project_id)
            && (self.key_file.is_some() || has(&self.access_token))
    }
}
