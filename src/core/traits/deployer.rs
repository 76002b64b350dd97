//! Deployer trait definition
//!
//! Every deployment target implements [`Deployer`]. The trait covers the
//! deployment lifecycle plus the handful of properties the gateway needs to
//! route traffic to the target.

use crate::utils::error::Result;
use async_trait::async_trait;
use std::fmt::Debug;

/// Deployment target capability
///
/// A deployer is a single-use session object. Construct it from
/// configuration, call [`init`](Deployer::init), then
/// [`deploy`](Deployer::deploy) and finally [`test`](Deployer::test).
#[async_trait]
pub trait Deployer: Send + Sync + Debug {
    // ==================== Identity ====================

    /// Stable lowercase identifier, such as "google"
    fn id(&self) -> &'static str;

    /// Display name
    ///
    /// # Note
    /// The gateway uses this as the backend name, so it must be unique among
    /// the deployers behind one gateway
    fn name(&self) -> &str;

    // ==================== Lifecycle ====================

    /// Whether enough configuration is present to deploy
    fn ready(&self) -> bool;

    /// Fail with a validation error when the deployer is not [`ready`](Deployer::ready)
    fn validate(&self) -> Result<()>;

    /// Build the provider client and authenticate
    async fn init(&mut self) -> Result<()>;

    /// Upload and publish the function
    async fn deploy(&mut self) -> Result<()>;

    /// Smoke-test the deployed function
    async fn test(&self) -> Result<()>;

    // ==================== Gateway Integration ====================

    /// Host name the gateway connects to
    fn host(&self) -> String;

    /// Path prefix under which the function is served on [`host`](Deployer::host)
    fn base_path(&self) -> String;

    /// VCL expression producing the backend request URL
    fn url_vcl(&self) -> String;

    /// Extra VCL run when this deployer is picked as the fallback backend
    fn custom_vcl(&self) -> String {
        String::new()
    }
}
