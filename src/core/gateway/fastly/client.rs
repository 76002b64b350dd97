//! Fastly REST client and versioned configuration transactions

use super::error::FastlyError;
use super::types::{Version, VersionedResource};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

const AUTH_HEADER: &str = "Fastly-Key";

/// Client bound to one Fastly service
#[derive(Debug, Clone)]
pub struct FastlyClient {
    http_client: Client,
    api_base: String,
    auth: String,
    service_id: String,
}

impl FastlyClient {
    pub fn new(http_client: Client, api_base: &str, auth: &str, service_id: &str) -> Self {
        Self {
            http_client,
            api_base: api_base.to_string(),
            auth: auth.to_string(),
            service_id: service_id.to_string(),
        }
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    /// `{api_base}/service/{service_id}/{segments...}` with each segment escaped
    fn url(&self, segments: &[&str]) -> Result<Url, FastlyError> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| FastlyError::Configuration(format!("Invalid API base {}: {}", self.api_base, e)))?;
        url.path_segments_mut()
            .map_err(|_| FastlyError::Configuration(format!("Invalid API base {}", self.api_base)))?
            .pop_if_empty()
            .push("service")
            .push(&self.service_id)
            .extend(segments);
        Ok(url)
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, FastlyError> {
        let response = request.header(AUTH_HEADER, &self.auth).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FastlyError::from_response(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(FastlyError::from)
    }

    async fn call<T: DeserializeOwned>(&self, method: Method, segments: &[&str]) -> Result<T, FastlyError> {
        let url = self.url(segments)?;
        debug!("{} {}", method, url);
        self.execute(self.http_client.request(method, url)).await
    }

    /// List all versions of the service
    pub async fn list_versions(&self) -> Result<Vec<Version>, FastlyError> {
        self.call(Method::GET, &["version"]).await
    }

    /// Clone a version into a new editable draft
    pub async fn clone_version(&self, number: u32) -> Result<Version, FastlyError> {
        self.call(Method::PUT, &["version", &number.to_string(), "clone"]).await
    }

    /// Activate a version
    pub async fn activate_version(&self, number: u32) -> Result<Version, FastlyError> {
        self.call(Method::PUT, &["version", &number.to_string(), "activate"]).await
    }

    /// Open a transaction on a draft cloned from the active version, or from
    /// the newest version when none is active
    pub async fn transaction(&self) -> Result<FastlyTransaction<'_>, FastlyError> {
        let versions = self.list_versions().await?;
        let base = versions
            .iter()
            .find(|v| v.active)
            .or_else(|| versions.iter().max_by_key(|v| v.number))
            .ok_or_else(|| FastlyError::NoActiveVersion(self.service_id.clone()))?;

        let draft = self.clone_version(base.number).await?;
        info!(
            service = %self.service_id,
            from = base.number,
            to = draft.number,
            "cloned version"
        );

        Ok(FastlyTransaction {
            client: self,
            version: draft.number,
        })
    }

    /// Create a resource, updating it in place when it already exists
    pub async fn upsert<R: VersionedResource>(&self, version: u32, resource: &R) -> Result<(), FastlyError> {
        let number = version.to_string();
        let url = self.url(&["version", &number, R::KIND])?;
        debug!("POST {} ({})", url, resource.name());

        let created: Result<serde_json::Value, FastlyError> = self
            .execute(self.http_client.post(url).form(resource))
            .await;

        match created {
            Ok(_) => Ok(()),
            Err(e) if e.is_conflict() => {
                let url = self.url(&["version", &number, R::KIND, resource.name()])?;
                debug!("PUT {} (already exists)", url);
                self.execute::<serde_json::Value>(self.http_client.put(url).form(resource))
                    .await
                    .map(|_| ())
            }
            Err(e) => Err(e),
        }
    }
}

/// Writes against one draft version; nothing is live until [`commit`](Self::commit)
#[derive(Debug)]
pub struct FastlyTransaction<'a> {
    client: &'a FastlyClient,
    version: u32,
}

impl FastlyTransaction<'_> {
    /// Draft version number
    pub fn version(&self) -> u32 {
        self.version
    }

    pub async fn write<R: VersionedResource>(&self, resource: &R) -> Result<(), FastlyError> {
        self.client.upsert(self.version, resource).await
    }

    /// Activate the draft version
    pub async fn commit(self) -> Result<u32, FastlyError> {
        self.client.activate_version(self.version).await?;
        info!(
            service = %self.client.service_id,
            version = self.version,
            "activated version"
        );
        Ok(self.version)
    }
}
