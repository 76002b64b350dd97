//! Google Cloud authentication
//!
//! Supports two credential sources:
//! - Service Account JSON key file (JWT bearer grant)
//! - Pre-issued access token

use super::error::GoogleError;
use crate::config::GoogleConfig;
use crate::utils::logging::mask_secret;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Google authentication credentials
#[derive(Debug, Clone)]
pub enum GoogleCredentials {
    /// Service Account JSON key
    ServiceAccount(ServiceAccountKey),

    /// Direct access token
    AccessToken(String),
}

/// Service Account key structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub key_type: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub private_key_id: String,
    pub private_key: String,
    pub client_email: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// OAuth2 Token with expiration
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Check if token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at - Duration::minutes(5) // 5 min buffer
    }
}

/// Authentication handler with token cache
#[derive(Debug, Clone)]
pub struct GoogleAuth {
    credentials: GoogleCredentials,
    token_cache: Arc<RwLock<Option<AccessToken>>>,
    http_client: reqwest::Client,
}

impl GoogleAuth {
    /// Create new authentication handler
    pub fn new(credentials: GoogleCredentials, http_client: reqwest::Client) -> Self {
        Self {
            credentials,
            token_cache: Arc::new(RwLock::new(None)),
            http_client,
        }
    }

    /// Build the handler from target configuration.
    ///
    /// A configured access token wins over the key file. The key's own
    /// `client_email` always signs the assertion; a different configured
    /// email only produces a warning.
    pub async fn from_config(
        config: &GoogleConfig,
        http_client: reqwest::Client,
    ) -> Result<Self, GoogleError> {
        if let Some(token) = config.access_token.as_deref().filter(|t| !t.is_empty()) {
            debug!("Using pre-issued Google access token {}", mask_secret(token));
            return Ok(Self::new(
                GoogleCredentials::AccessToken(token.to_string()),
                http_client,
            ));
        }

        let key_file = config.key_file.as_deref().ok_or_else(|| {
            GoogleError::Configuration("No service account key file configured".to_string())
        })?;

        let mut key = Self::load_key_file(key_file).await?;
        if let Some(email) = config.email.as_deref() {
            if email != key.client_email {
                warn!(
                    configured = %email,
                    key_owner = %key.client_email,
                    "configured email differs from key file client_email"
                );
            }
        }
        if let Some(ref token_uri) = config.token_uri {
            key.token_uri = token_uri.clone();
        }

        Ok(Self::new(GoogleCredentials::ServiceAccount(key), http_client))
    }

    /// Load a service account key, resolving `path` against the working directory
    pub async fn load_key_file(path: &Path) -> Result<ServiceAccountKey, GoogleError> {
        let path = std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf());

        let contents = tokio::fs::read_to_string(&path).await.map_err(|e| {
            GoogleError::Authentication(format!("Failed to read key file {:?}: {}", path, e))
        })?;
        Self::parse_service_account_key(&contents)
    }

    /// Parse a service account key from JSON
    pub fn parse_service_account_key(json_str: &str) -> Result<ServiceAccountKey, GoogleError> {
        let key: ServiceAccountKey = serde_json::from_str(json_str)
            .map_err(|e| GoogleError::Authentication(format!("Invalid key file: {}", e)))?;

        if key.key_type != "service_account" {
            return Err(GoogleError::Authentication(format!(
                "Unsupported credential type: {}",
                key.key_type
            )));
        }
        Ok(key)
    }

    /// Get a valid access token
    pub async fn get_access_token(&self) -> Result<String, GoogleError> {
        // Check cache first
        {
            let cache = self.token_cache.read().await;
            if let Some(ref token) = *cache {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        let new_token = match &self.credentials {
            GoogleCredentials::ServiceAccount(key) => self.get_service_account_token(key).await?,
            GoogleCredentials::AccessToken(token) => AccessToken {
                token: token.clone(),
                expires_at: Utc::now() + Duration::hours(1),
            },
        };

        let token_string = new_token.token.clone();
        {
            let mut cache = self.token_cache.write().await;
            *cache = Some(new_token);
        }

        Ok(token_string)
    }

    /// Get token for service account
    async fn get_service_account_token(
        &self,
        key: &ServiceAccountKey,
    ) -> Result<AccessToken, GoogleError> {
        use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

        #[derive(Debug, Serialize)]
        struct Claims {
            iss: String,
            scope: String,
            aud: String,
            exp: i64,
            iat: i64,
        }

        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: key.client_email.clone(),
            scope: CLOUD_PLATFORM_SCOPE.to_string(),
            aud: key.token_uri.clone(),
            exp: now + 3600,
            iat: now,
        };

        let mut header = Header::new(Algorithm::RS256);
        if !key.private_key_id.is_empty() {
            header.kid = Some(key.private_key_id.clone());
        }
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| GoogleError::Authentication(format!("Invalid private key: {}", e)))?;
        let jwt = encode(&header, &claims, &encoding_key)
            .map_err(|e| GoogleError::Authentication(format!("Failed to sign JWT: {}", e)))?;

        // Exchange JWT for access token
        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", &jwt),
        ];

        let response = self
            .http_client
            .post(&key.token_uri)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GoogleError::Authentication(format!(
                "Token exchange failed with status {}: {}",
                status, body
            )));
        }

        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
            expires_in: i64,
        }

        let token_response: TokenResponse = response.json().await?;

        Ok(AccessToken {
            token: token_response.access_token,
            expires_at: Utc::now() + Duration::seconds(token_response.expires_in),
        })
    }
}
