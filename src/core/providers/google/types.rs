//! Cloud Functions v1 REST resources

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Role granting anonymous invocation
pub const INVOKER_ROLE: &str = "roles/cloudfunctions.invoker";
/// Principal representing everyone on the internet
pub const ALL_USERS: &str = "allUsers";

/// `CloudFunction` resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudFunction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_point: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_memory_mb: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account_email: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment_variables: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub https_trigger: Option<HttpsTrigger>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_upload_url: Option<String>,
    #[serde(default, skip_serializing)]
    pub status: Option<String>,
}

impl CloudFunction {
    /// Live HTTPS trigger URL, if the provider reported one
    pub fn trigger_url(&self) -> Option<&str> {
        self.https_trigger.as_ref().and_then(|t| t.url.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpsTrigger {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// `google.rpc.Status`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
    /// Symbolic status (only present in HTTP error envelopes)
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub details: Vec<Value>,
}

/// HTTP error envelope `{"error": Status}`
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: Status,
}

/// Long-running operation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<Status>,
    #[serde(default)]
    pub response: Option<Value>,
}

impl Operation {
    /// The function carried in a completed operation's response
    pub fn function(&self) -> Option<CloudFunction> {
        self.response
            .clone()
            .and_then(|r| serde_json::from_value(r).ok())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateUploadUrlResponse {
    pub upload_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    #[serde(default)]
    pub bindings: Vec<Binding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub role: String,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SetIamPolicyRequest {
    pub policy: Policy,
}

impl SetIamPolicyRequest {
    /// Policy that lets anyone invoke the function
    pub fn public_invoker() -> Self {
        Self {
            policy: Policy {
                bindings: vec![Binding {
                    role: INVOKER_ROLE.to_string(),
                    members: vec![ALL_USERS.to_string()],
                }],
                etag: None,
            },
        }
    }
}
