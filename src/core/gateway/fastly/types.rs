//! Fastly service configuration resources
//!
//! Each resource is sent form-encoded; field names follow the Fastly API.

use super::vcl::{BackendTarget, healthcheck_path};
use serde::{Deserialize, Serialize};

/// Priority shared by the condition and every snippet
pub const PRIORITY: u32 = 10;
/// Name of the request condition that never matches
pub const DISABLED_CONDITION: &str = "false";

/// A resource that lives inside a service version
pub trait VersionedResource: Serialize + Send + Sync {
    /// Path segment of the resource collection, e.g. `backend`
    const KIND: &'static str;

    fn name(&self) -> &str;
}

/// Service version
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Version {
    pub number: u32,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub locked: bool,
}

/// Request condition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    pub name: String,
    pub statement: String,
    #[serde(rename = "type")]
    pub condition_type: String,
    pub priority: u32,
}

impl Condition {
    /// Condition that never matches, attached to backends so Fastly does not
    /// route to them implicitly
    pub fn disabled() -> Self {
        Self {
            name: DISABLED_CONDITION.to_string(),
            statement: "false".to_string(),
            condition_type: "REQUEST".to_string(),
            priority: PRIORITY,
        }
    }
}

impl VersionedResource for Condition {
    const KIND: &'static str = "condition";

    fn name(&self) -> &str {
        &self.name
    }
}

/// Backend health check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Healthcheck {
    pub name: String,
    pub check_interval: u32,
    pub expected_response: u16,
    pub timeout: u32,
    pub method: String,
    pub http_version: String,
    pub path: String,
    pub host: String,
    pub threshold: u32,
    pub window: u32,
    pub initial: u32,
}

impl Healthcheck {
    pub fn for_target(target: &BackendTarget, checkpath: &str) -> Self {
        Self {
            name: target.healthcheck_name(),
            check_interval: 60_000,
            expected_response: 200,
            timeout: 5_000,
            method: "GET".to_string(),
            http_version: "1.1".to_string(),
            path: healthcheck_path(&target.base_path, checkpath),
            host: target.host.clone(),
            threshold: 1,
            window: 2,
            initial: 1,
        }
    }
}

impl VersionedResource for Healthcheck {
    const KIND: &'static str = "healthcheck";

    fn name(&self) -> &str {
        &self.name
    }
}

/// Origin backend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Backend {
    pub name: String,
    pub address: String,
    pub hostname: String,
    pub ssl_cert_hostname: String,
    pub ssl_sni_hostname: String,
    pub override_host: String,
    pub port: u16,
    pub use_ssl: bool,
    pub connect_timeout: u32,
    pub first_byte_timeout: u32,
    pub between_bytes_timeout: u32,
    pub max_conn: u32,
    pub weight: u32,
    pub error_threshold: u32,
    pub healthcheck: String,
    pub request_condition: String,
}

impl Backend {
    pub fn for_target(target: &BackendTarget) -> Self {
        Self {
            name: target.name.clone(),
            address: target.host.clone(),
            hostname: target.host.clone(),
            ssl_cert_hostname: target.host.clone(),
            ssl_sni_hostname: target.host.clone(),
            override_host: target.host.clone(),
            port: 443,
            use_ssl: true,
            connect_timeout: 5_000,
            first_byte_timeout: 60_000,
            between_bytes_timeout: 10_000,
            max_conn: 200,
            weight: 100,
            error_threshold: 0,
            healthcheck: target.healthcheck_name(),
            request_condition: DISABLED_CONDITION.to_string(),
        }
    }
}

impl VersionedResource for Backend {
    const KIND: &'static str = "backend";

    fn name(&self) -> &str {
        &self.name
    }
}

/// VCL subroutine a snippet is inserted into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnippetType {
    Recv,
    Miss,
    Pass,
    Fetch,
}

/// Versioned VCL snippet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snippet {
    pub name: String,
    #[serde(rename = "type")]
    pub snippet_type: SnippetType,
    pub priority: u32,
    pub dynamic: u8,
    pub content: String,
}

impl Snippet {
    pub fn new(name: &str, snippet_type: SnippetType, content: String) -> Self {
        Self {
            name: name.to_string(),
            snippet_type,
            priority: PRIORITY,
            dynamic: 0,
            content,
        }
    }
}

impl VersionedResource for Snippet {
    const KIND: &'static str = "snippet";

    fn name(&self) -> &str {
        &self.name
    }
}
