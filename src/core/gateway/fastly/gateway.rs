//! Fastly load-balancing gateway

use super::client::FastlyClient;
use super::error::FastlyError;
use super::types::{Backend, Condition, Healthcheck, Snippet, SnippetType};
use super::vcl::{BackendTarget, backend_selection_vcl, log_url_vcl, url_rewrite_vcl};
use crate::config::{Config, HttpConfig, default_fastly_api_base};
use crate::core::providers::base::build_http_client;
use crate::core::traits::Deployer;
use crate::utils::error::Result;
use crate::utils::logging::mask_secret;
use futures::future::try_join_all;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Fronts deployed functions with a health-checked, randomly balanced Fastly service
#[derive(Debug, Clone)]
pub struct FastlyGateway {
    auth: Option<String>,
    service_id: Option<String>,
    checkpath: Option<String>,
    api_base: String,
    http: HttpConfig,
    targets: Vec<BackendTarget>,
    client: Option<FastlyClient>,
}

impl Default for FastlyGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl FastlyGateway {
    pub fn new() -> Self {
        Self {
            auth: None,
            service_id: None,
            checkpath: None,
            api_base: default_fastly_api_base(),
            http: HttpConfig::default(),
            targets: Vec::new(),
            client: None,
        }
    }

    /// Gateway configured from the `fastly` and `http` sections; deployers are added separately
    pub fn from_config(config: &Config) -> Self {
        let mut gateway = Self::new()
            .with_checkpath(&config.fastly.checkpath)
            .with_api_base(&config.fastly.api_base)
            .with_http_config(config.http.clone());
        if let Some(ref auth) = config.fastly.auth {
            gateway = gateway.with_auth(auth);
        }
        if let Some(ref service_id) = config.fastly.service_id {
            gateway = gateway.with_service_id(service_id);
        }
        gateway
    }

    pub fn with_auth(mut self, auth: impl Into<String>) -> Self {
        self.auth = Some(auth.into());
        self
    }

    pub fn with_service_id(mut self, service_id: impl Into<String>) -> Self {
        self.service_id = Some(service_id.into());
        self
    }

    pub fn with_checkpath(mut self, checkpath: impl Into<String>) -> Self {
        self.checkpath = Some(checkpath.into());
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_http_config(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    /// Add a deployer as a backend; the first one added is the fallback
    pub fn with_deployer(self, deployer: &dyn Deployer) -> Self {
        self.with_target(BackendTarget::from(deployer))
    }

    pub fn with_target(mut self, target: BackendTarget) -> Self {
        self.targets.push(target);
        self
    }

    pub fn targets(&self) -> &[BackendTarget] {
        &self.targets
    }

    /// Why the gateway cannot deploy yet, if anything is missing
    fn missing(&self) -> Option<String> {
        let set = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        if !set(&self.auth) {
            Some("no Fastly auth token".to_string())
        } else if !set(&self.service_id) {
            Some("no Fastly service ID".to_string())
        } else if !set(&self.checkpath) {
            Some("no health check path".to_string())
        } else if self.targets.is_empty() {
            Some("no deployers".to_string())
        } else {
            self.ident_collision()
        }
    }

    /// Backends must map to distinct VCL identifiers
    fn ident_collision(&self) -> Option<String> {
        let mut seen: HashMap<String, &str> = HashMap::new();
        for target in &self.targets {
            if let Some(previous) = seen.insert(target.ident(), &target.name) {
                return Some(format!(
                    "backends {} and {} share the VCL identifier {}",
                    previous,
                    target.name,
                    target.ident()
                ));
            }
        }
        None
    }

    pub fn ready(&self) -> bool {
        self.missing().is_none()
    }

    /// Build the API client once the gateway is ready; no-op otherwise or when already built
    pub fn init(&mut self) -> Result<()> {
        if self.client.is_some() {
            return Ok(());
        }
        let (Some(auth), Some(service_id)) = (&self.auth, &self.service_id) else {
            return Ok(());
        };
        if !self.ready() {
            return Ok(());
        }

        let http_client = build_http_client(&self.http)?;
        self.client = Some(FastlyClient::new(http_client, &self.api_base, auth, service_id));
        debug!(
            "Fastly client initialized for service {} with key {}",
            service_id,
            mask_secret(auth)
        );
        Ok(())
    }

    /// Condition, health checks, backends and snippets for the current targets
    pub fn plan(&self) -> (Condition, Vec<Healthcheck>, Vec<Backend>, Vec<Snippet>) {
        let checkpath = self.checkpath.as_deref().unwrap_or_default();
        let healthchecks = self
            .targets
            .iter()
            .map(|t| Healthcheck::for_target(t, checkpath))
            .collect();
        let backends = self.targets.iter().map(Backend::for_target).collect();
        let rewrite = url_rewrite_vcl(&self.targets);
        let snippets = vec![
            Snippet::new("backend", SnippetType::Recv, backend_selection_vcl(&self.targets)),
            Snippet::new("missurl", SnippetType::Miss, rewrite.clone()),
            Snippet::new("passurl", SnippetType::Pass, rewrite),
            Snippet::new("logurl", SnippetType::Fetch, log_url_vcl()),
        ];
        (Condition::disabled(), healthchecks, backends, snippets)
    }

    /// Write the whole configuration in one transaction and activate it.
    ///
    /// Returns the activated version. On failure the draft version is left
    /// unactivated.
    #[instrument(skip(self), fields(backends = self.targets.len()))]
    pub async fn deploy(&mut self) -> Result<u32> {
        if let Some(reason) = self.missing() {
            return Err(FastlyError::NotReady(reason).into());
        }
        self.init()?;
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| FastlyError::NotReady("client not initialized".to_string()))?;

        let (condition, healthchecks, backends, snippets) = self.plan();
        let tx = client.transaction().await?;

        tx.write(&condition).await?;
        try_join_all(healthchecks.iter().map(|h| tx.write(h))).await?;
        info!(count = healthchecks.len(), "wrote health checks");
        try_join_all(backends.iter().map(|b| tx.write(b))).await?;
        info!(count = backends.len(), "wrote backends");
        for snippet in &snippets {
            tx.write(snippet).await?;
        }
        info!(count = snippets.len(), "wrote snippets");

        let version = tx.commit().await?;
        Ok(version)
    }
}
