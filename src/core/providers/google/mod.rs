//! Google Cloud Functions target
//!
//! Deploys a packaged Node.js function as a 1st gen HTTPS Cloud Function and
//! makes it publicly invocable.

pub mod auth;
pub mod client;
pub mod deployer;
pub mod error;
pub mod naming;
pub mod types;

pub use auth::{GoogleAuth, GoogleCredentials, ServiceAccountKey};
pub use client::CloudFunctionsClient;
pub use deployer::{FunctionPresence, GoogleDeployer};
pub use error::{ErrorDetails, GoogleError};
