//! Google Cloud Functions deployer

use super::auth::GoogleAuth;
use super::client::{CloudFunctionsClient, MAX_UPLOAD_BYTES};
use super::error::GoogleError;
use super::naming::{
    ENTRY_POINT, fallback_function_url, full_function_name, function_host,
    function_resource_name, label_value, runtime,
};
use super::types::{CloudFunction, HttpsTrigger};
use crate::config::{Config, FunctionConfig, GoogleConfig};
use crate::core::providers::base::{TestRequest, build_http_client, test_request};
use crate::core::traits::Deployer;
use crate::utils::error::{DeployError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

const TRACE_HEADER: &str = "X-Cloud-Trace-Context";

/// Outcome of the pre-deploy existence lookup
#[derive(Debug)]
pub enum FunctionPresence {
    Exists,
    Missing,
    /// The lookup failed for a reason other than not-found
    Unknown(GoogleError),
}

impl FunctionPresence {
    fn from_lookup(result: std::result::Result<CloudFunction, GoogleError>) -> Self {
        match result {
            Ok(_) => Self::Exists,
            Err(e) if e.is_not_found() => Self::Missing,
            Err(e) => Self::Unknown(e),
        }
    }

    /// Whether to issue an update instead of a create.
    ///
    /// A failed lookup is treated like a missing function.
    pub fn should_update(&self) -> bool {
        matches!(self, Self::Exists)
    }
}

/// Deploys a packaged function to Google Cloud Functions
#[derive(Debug)]
pub struct GoogleDeployer {
    config: GoogleConfig,
    function: FunctionConfig,
    full_function_name: String,
    http_client: Client,
    client: Option<CloudFunctionsClient>,
    upload_url: Option<String>,
    function_resource: Option<String>,
    function_url: Option<String>,
    test_retry_delay: Duration,
}

impl GoogleDeployer {
    /// Create a deployer; no network access happens until [`Deployer::init`]
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = build_http_client(&config.http)?;
        Ok(Self {
            full_function_name: full_function_name(
                &config.function.package_name,
                &config.function.name,
            ),
            config: config.google.clone(),
            function: config.function.clone(),
            http_client,
            client: None,
            upload_url: None,
            function_resource: None,
            function_url: None,
            test_retry_delay: Duration::from_secs(5),
        })
    }

    /// Override the pause before retrying a 404 in [`Deployer::test`]
    pub fn with_test_retry_delay(mut self, delay: Duration) -> Self {
        self.test_retry_delay = delay;
        self
    }

    pub fn full_function_name(&self) -> &str {
        &self.full_function_name
    }

    /// Signed upload URL obtained by the last [`upload_zip`](Self::upload_zip)
    pub fn upload_url(&self) -> Option<&str> {
        self.upload_url.as_deref()
    }

    /// Resource name written by the last [`create_function`](Self::create_function)
    pub fn function_resource(&self) -> Option<&str> {
        self.function_resource.as_deref()
    }

    /// Live HTTPS trigger URL reported by the provider
    pub fn function_url(&self) -> Option<&str> {
        self.function_url.as_deref()
    }

    fn project_id(&self) -> &str {
        self.config.project_id.as_deref().unwrap_or_default()
    }

    fn client(&self) -> Result<&CloudFunctionsClient> {
        self.client.as_ref().ok_or_else(|| {
            DeployError::validation("Google deployer is not initialized; call init() first")
        })
    }

    fn resource_name(&self) -> String {
        function_resource_name(
            self.project_id(),
            &self.config.region,
            &self.full_function_name,
        )
    }

    /// URL probed by [`Deployer::test`]
    pub fn test_url(&self) -> String {
        let base = match self.function_url {
            Some(ref url) => url.clone(),
            None => fallback_function_url(
                &self.config.region,
                self.project_id(),
                &self.full_function_name,
            ),
        };
        format!("{}{}", base, self.function.test_path)
    }

    /// Resource payload for create/update
    pub fn function_payload(&self, name: &str, upload_url: &str) -> CloudFunction {
        let mut labels = BTreeMap::new();
        labels.insert("pkgversion".to_string(), label_value(&self.function.version));
        labels.insert("updated".to_string(), label_value(&self.function.updated.to_string()));

        CloudFunction {
            name: Some(name.to_string()),
            description: self.function.description.clone(),
            entry_point: Some(ENTRY_POINT.to_string()),
            runtime: Some(runtime(&self.function.node_version)),
            available_memory_mb: Some(self.function.memory),
            service_account_email: self.config.email.clone(),
            labels,
            environment_variables: self.function.params.clone(),
            https_trigger: Some(HttpsTrigger::default()),
            source_upload_url: Some(upload_url.to_string()),
            status: None,
        }
    }

    /// Request a signed upload URL and PUT the archive to it
    #[instrument(skip(self), fields(function = %self.full_function_name))]
    pub async fn upload_zip(&mut self) -> Result<()> {
        let archive = self.function.archive.clone().ok_or_else(|| {
            DeployError::config("No archive configured for the function")
        })?;

        let size = tokio::fs::metadata(&archive).await?.len();
        if size > MAX_UPLOAD_BYTES {
            return Err(DeployError::validation(format!(
                "Archive {:?} is {} bytes, the upload limit is {} bytes",
                archive, size, MAX_UPLOAD_BYTES
            )));
        }

        let client = self.client()?;
        let upload_url = client.generate_upload_url().await?;
        info!(archive = ?archive, bytes = size, "uploading archive");

        let bytes = tokio::fs::read(&archive).await?;
        client.upload_archive(&upload_url, bytes).await?;
        info!("upload complete");

        self.upload_url = Some(upload_url);
        Ok(())
    }

    /// Create or update the function, wait for it, then make it public
    #[instrument(skip(self), fields(function = %self.full_function_name))]
    pub async fn create_function(&mut self) -> Result<()> {
        let upload_url = self
            .upload_url
            .clone()
            .ok_or_else(|| DeployError::validation("Archive must be uploaded before creating the function"))?;
        let name = self.resource_name();

        match self.publish(&name, &upload_url).await {
            Ok(url) => {
                info!(function = %name, url = url.as_deref().unwrap_or("<unknown>"), "function deployed");
                self.function_resource = Some(name);
                self.function_url = url;
                Ok(())
            }
            Err(e) => {
                log_diagnostics(&e);
                Err(e.into())
            }
        }
    }

    async fn publish(&self, name: &str, upload_url: &str) -> std::result::Result<Option<String>, GoogleError> {
        let client = self.client.as_ref().ok_or_else(|| {
            GoogleError::Configuration("Google deployer is not initialized".to_string())
        })?;

        let presence = FunctionPresence::from_lookup(client.get_function(name).await);
        if let FunctionPresence::Unknown(ref e) = presence {
            warn!(function = %name, error = %e, "unable to check whether function exists, creating it");
        }

        let payload = self.function_payload(name, upload_url);
        let operation = if presence.should_update() {
            info!(function = %name, "updating existing function");
            client.update_function(name, &payload).await?
        } else {
            info!(function = %name, "creating function");
            client.create_function(&payload).await?
        };

        let operation = client
            .wait_for_operation(
                operation,
                Duration::from_secs(self.config.operation_poll_seconds),
                Duration::from_secs(self.config.operation_timeout_seconds),
            )
            .await?;

        client.set_public_invoker(name).await?;
        info!(function = %name, "granted public invoker access");

        Ok(operation.function().and_then(|f| f.trigger_url().map(str::to_string)))
    }
}

/// Log the provider-supplied diagnostics of a failed call
fn log_diagnostics(err: &GoogleError) {
    error!("Google deployment step failed: {}", err);
    if let Some(details) = err.details() {
        error!(
            status = details.status.as_deref().unwrap_or("UNKNOWN"),
            "provider diagnostics: {}",
            serde_json::to_string(&details.details).unwrap_or_default()
        );
    }
}

#[async_trait]
impl Deployer for GoogleDeployer {
    fn id(&self) -> &'static str {
        "google"
    }

    fn name(&self) -> &str {
        "Google"
    }

    fn ready(&self) -> bool {
        self.config.has_credentials()
    }

    fn validate(&self) -> Result<()> {
        if !self.ready() {
            return Err(DeployError::validation(
                "Google target needs email, key file (or access token) and project ID",
            ));
        }
        Ok(())
    }

    async fn init(&mut self) -> Result<()> {
        self.validate()?;

        let auth = GoogleAuth::from_config(&self.config, self.http_client.clone()).await;
        let client = auth.map(|auth| {
            CloudFunctionsClient::new(self.http_client.clone(), auth, &self.config, self.project_id())
        });

        let client = match client {
            Ok(client) => client,
            Err(e) => {
                error!("Unable to authenticate with Google: {}", e);
                return Err(e.into());
            }
        };
        if let Err(e) = client.authenticate().await {
            error!("Unable to authenticate with Google: {}", e);
            return Err(e.into());
        }

        self.client = Some(client);
        Ok(())
    }

    #[instrument(skip(self), fields(function = %self.full_function_name))]
    async fn deploy(&mut self) -> Result<()> {
        self.upload_zip()
            .await
            .map_err(|e| DeployError::deployment("Google", e))?;
        self.create_function()
            .await
            .map_err(|e| DeployError::deployment("Google", e))?;
        Ok(())
    }

    async fn test(&self) -> Result<()> {
        let trace_id = format!("{}/0;o=1", Uuid::new_v4().simple());
        let request = TestRequest::new(self.test_url(), TRACE_HEADER, trace_id)
            .with_retry_delay(self.test_retry_delay);
        test_request(&self.http_client, &request).await?;
        Ok(())
    }

    fn host(&self) -> String {
        function_host(&self.config.region, self.project_id())
    }

    fn base_path(&self) -> String {
        format!("/{}", self.full_function_name)
    }

    fn url_vcl(&self) -> String {
        format!("\"/{}\" + req.url", self.full_function_name)
    }
}
