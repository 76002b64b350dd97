//! # deploykit
//!
//! Deploys a packaged Node.js function to Google Cloud Functions and fronts
//! it with a Fastly service that health-checks and load-balances across the
//! deployed backends.
//!
//! ## Features
//!
//! - **Google Cloud Functions**: upload, create-or-update, wait for the
//!   long-running operation, grant public invoke, smoke test
//! - **Fastly gateway**: health checks, backends and generated VCL written in
//!   a single versioned transaction
//! - **Layered configuration**: YAML file, `DEPLOYKIT_*` environment
//!   variables and command line flags
//!
//! ## Usage
//!
//! ```rust,no_run
//! use deploykit::{Config, Deployer, FastlyGateway, GoogleDeployer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("deploy.yaml").await?;
//!
//!     let mut deployer = GoogleDeployer::new(&config)?;
//!     deployer.init().await?;
//!     deployer.deploy().await?;
//!     deployer.test().await?;
//!
//!     let mut gateway = FastlyGateway::from_config(&config).with_deployer(&deployer);
//!     gateway.deploy().await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod cli;
pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use core::gateway::FastlyGateway;
pub use core::providers::google::GoogleDeployer;
pub use core::traits::Deployer;
pub use utils::error::{DeployError, Result};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Build information stamped by the build script
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build timestamp (seconds since the Unix epoch)
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
            rust_version: env!("RUST_VERSION"),
        }
    }
}

/// Build
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
