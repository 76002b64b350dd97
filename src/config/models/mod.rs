//! Configuration data models
//!
//! This module defines all configuration structures used by the deployers and the gateway.

#![allow(missing_docs)]

pub mod fastly;
pub mod function;
pub mod google;
pub mod http;
pub mod logging;

// Re-export all configuration types
pub use fastly::*;
pub use function::*;
pub use google::*;
pub use http::*;
pub use logging::*;

/// Default Google Cloud Functions region
pub fn default_region() -> String {
    "us-central1".to_string()
}

/// Default Cloud Functions REST endpoint
pub fn default_google_api_base() -> String {
    "https://cloudfunctions.googleapis.com/v1".to_string()
}

/// Default Fastly REST endpoint
pub fn default_fastly_api_base() -> String {
    "https://api.fastly.com".to_string()
}

/// Default health check path appended to each backend's base path
pub fn default_checkpath() -> String {
    "/_status_check/healthcheck.json".to_string()
}

/// Default function memory in MB
pub fn default_memory() -> u32 {
    256
}

/// Default Node.js major version
pub fn default_node_version() -> String {
    "18".to_string()
}

/// Default HTTP request timeout in seconds
pub fn default_timeout() -> u64 {
    600
}

/// Default interval between long-running operation polls
pub fn default_operation_poll_seconds() -> u64 {
    2
}

/// Default total wait for a long-running operation
pub fn default_operation_timeout_seconds() -> u64 {
    900
}

pub fn default_log_level() -> String {
    "info".to_string()
}
