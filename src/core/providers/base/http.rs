use std::time::Duration;

use reqwest::Client;

use crate::config::HttpConfig;
use crate::utils::error::{DeployError, Result};

/// Client settings that are not user configurable
pub struct ClientConfig;
impl ClientConfig {
    pub const KEEPALIVE_SECS: u64 = 90;
    pub const CONNECT_TIMEOUT_SECS: u64 = 30;
    pub const USER_AGENT: &'static str = concat!("deploykit/", env!("CARGO_PKG_VERSION"));
}

/// Build the HTTP client shared by a deployer or gateway
pub fn build_http_client(config: &HttpConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .connect_timeout(Duration::from_secs(ClientConfig::CONNECT_TIMEOUT_SECS))
        .pool_idle_timeout(Duration::from_secs(ClientConfig::KEEPALIVE_SECS))
        .user_agent(ClientConfig::USER_AGENT)
        .build()
        .map_err(|e| DeployError::config(format!("Failed to create HTTP client: {}", e)))
}
