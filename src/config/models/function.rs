//! Function (deployment unit) configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Metadata of the function being deployed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionConfig {
    /// Function name, may carry a version suffix (`name@1.2.3`)
    pub name: String,
    /// Package the function belongs to
    pub package_name: String,
    /// Human readable description
    #[serde(default)]
    pub description: String,
    /// Package version, stored as a resource label
    #[serde(default)]
    pub version: String,
    /// Memory limit in MB
    #[serde(default = "default_memory")]
    pub memory: u32,
    /// Node.js major version for the runtime string
    #[serde(default = "default_node_version")]
    pub node_version: String,
    /// Environment variables passed to the function
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    /// Update timestamp (epoch millis), stored as a resource label
    #[serde(default = "current_timestamp_millis")]
    pub updated: i64,
    /// ZIP archive produced by the build step
    #[serde(default)]
    pub archive: Option<PathBuf>,
    /// Path appended to the function URL by the post-deploy test
    #[serde(default)]
    pub test_path: String,
}

impl Default for FunctionConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            package_name: String::new(),
            description: String::new(),
            version: String::new(),
            memory: default_memory(),
            node_version: default_node_version(),
            params: BTreeMap::new(),
            updated: current_timestamp_millis(),
            archive: None,
            test_path: String::new(),
        }
    }
}

fn current_timestamp_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
