//! Cloud Functions v1 REST client

use super::auth::GoogleAuth;
use super::error::GoogleError;
use super::naming::location_path;
use super::types::{
    CloudFunction, GenerateUploadUrlResponse, Operation, Policy, SetIamPolicyRequest,
};
use crate::config::GoogleConfig;
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::{Duration, Instant};
use tracing::debug;

/// Upper bound on the archive size accepted by the signed upload URL
pub const MAX_UPLOAD_BYTES: u64 = 104_857_600;

/// Authenticated client for one project/region
#[derive(Debug, Clone)]
pub struct CloudFunctionsClient {
    http_client: Client,
    auth: GoogleAuth,
    api_base: String,
    location: String,
}

impl CloudFunctionsClient {
    pub fn new(
        http_client: Client,
        auth: GoogleAuth,
        config: &GoogleConfig,
        project_id: &str,
    ) -> Self {
        Self {
            http_client,
            auth,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            location: location_path(project_id, &config.region),
        }
    }

    /// Fetch a token to verify the credentials work
    pub async fn authenticate(&self) -> Result<(), GoogleError> {
        self.auth.get_access_token().await.map(|_| ())
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.api_base, resource)
    }

    /// Make an authenticated request
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GoogleError> {
        let token = self.auth.get_access_token().await?;
        let response = request.bearer_auth(token).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GoogleError::from_response(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(GoogleError::from)
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: &B,
    ) -> Result<T, GoogleError> {
        debug!("{} {}", method, url);
        self.execute(self.http_client.request(method, url).json(body))
            .await
    }

    /// Request a signed URL for uploading the source archive
    pub async fn generate_upload_url(&self) -> Result<String, GoogleError> {
        let url = self.url(&format!("{}/functions:generateUploadUrl", self.location));
        let response: GenerateUploadUrlResponse =
            self.send_json(Method::POST, &url, &json!({})).await?;
        Ok(response.upload_url)
    }

    /// PUT the archive to a signed upload URL (no bearer token: the URL is the credential)
    pub async fn upload_archive(&self, upload_url: &str, archive: Vec<u8>) -> Result<(), GoogleError> {
        debug!("Uploading {} bytes", archive.len());
        let response = self
            .http_client
            .put(upload_url)
            .header(reqwest::header::CONTENT_TYPE, "application/zip")
            .header(
                "x-goog-content-length-range",
                format!("0,{}", MAX_UPLOAD_BYTES),
            )
            .body(archive)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GoogleError::Upload {
                status_code: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    /// Look up a function by resource name
    pub async fn get_function(&self, name: &str) -> Result<CloudFunction, GoogleError> {
        let url = self.url(name);
        debug!("GET {}", url);
        self.execute(self.http_client.get(&url)).await
    }

    pub async fn create_function(&self, function: &CloudFunction) -> Result<Operation, GoogleError> {
        let url = self.url(&format!("{}/functions", self.location));
        self.send_json(Method::POST, &url, function).await
    }

    pub async fn update_function(
        &self,
        name: &str,
        function: &CloudFunction,
    ) -> Result<Operation, GoogleError> {
        let url = self.url(name);
        self.send_json(Method::PATCH, &url, function).await
    }

    pub async fn get_operation(&self, name: &str) -> Result<Operation, GoogleError> {
        let url = self.url(name);
        self.execute(self.http_client.get(&url)).await
    }

    /// Poll `operation` until it is done, failed, or `timeout` elapsed
    pub async fn wait_for_operation(
        &self,
        mut operation: Operation,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<Operation, GoogleError> {
        let start = Instant::now();

        while !operation.done {
            if start.elapsed() >= timeout {
                return Err(GoogleError::OperationTimeout {
                    name: operation.name,
                    seconds: timeout.as_secs(),
                });
            }
            tokio::time::sleep(poll_interval).await;
            operation = self.get_operation(&operation.name).await?;
            debug!("Operation {} done={}", operation.name, operation.done);
        }

        if let Some(ref status) = operation.error {
            return Err(GoogleError::from_operation(&operation.name, status));
        }
        Ok(operation)
    }

    /// Grant `allUsers` the invoker role on a function
    pub async fn set_public_invoker(&self, name: &str) -> Result<Policy, GoogleError> {
        let url = self.url(&format!("{}:setIamPolicy", name));
        self.send_json(Method::POST, &url, &SetIamPolicyRequest::public_invoker())
            .await
    }
}
