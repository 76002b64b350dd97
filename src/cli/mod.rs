//! Command line interface
//!
//! `deploykit deploy` runs the full pipeline: deploy the function, smoke test
//! it, then publish the Fastly gateway in front of it.

use crate::config::{Config, LogFormat};
use crate::core::gateway::FastlyGateway;
use crate::core::providers::google::GoogleDeployer;
use crate::core::traits::Deployer;
use crate::utils::logging::init_logging;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_TIME"),
    ")"
);

/// Deploy functions to Google Cloud Functions behind a Fastly gateway
#[derive(Debug, Parser)]
#[command(name = "deploykit")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Deploy functions to Google Cloud Functions behind a Fastly gateway", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the YAML configuration file
    #[arg(short, long, value_name = "FILE", global = true, env = "DEPLOYKIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// ZIP archive to deploy (overrides config file)
    #[arg(short, long, value_name = "ZIP", global = true)]
    pub archive: Option<PathBuf>,

    /// Log level or filter directive (overrides config file)
    #[arg(short = 'v', long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Emit JSON log lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Deploy the function, test it and publish the gateway
    Deploy {
        /// Skip the post-deploy smoke test
        #[arg(long)]
        no_test: bool,
        /// Skip the Fastly gateway
        #[arg(long)]
        no_gateway: bool,
    },
    /// Smoke test the deployed function
    Test,
    /// Print the resolved configuration (secrets omitted)
    Config,
}

impl Cli {
    /// Apply command line flags on top of file and environment configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(ref archive) = self.archive {
            config.function.archive = Some(archive.clone());
        }
        if let Some(ref level) = self.log_level {
            config.logging.level = level.clone();
        }
        if self.json_logs {
            config.logging.format = LogFormat::Json;
        }
    }
}

/// Layer file, environment and command line settings, then validate the result
pub async fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())
        .await
        .context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Resolve configuration and run the selected command
pub async fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli).await?;

    if let Commands::Config = cli.command {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    init_logging(&config.logging)?;

    match cli.command {
        Commands::Deploy { no_test, no_gateway } => deploy(&config, !no_test, !no_gateway).await,
        Commands::Test => test(&config).await,
        Commands::Config => Ok(()),
    }
}

async fn deploy(config: &Config, run_test: bool, publish_gateway: bool) -> Result<()> {
    let mut deployer = GoogleDeployer::new(config)?;
    let target = deployer.name().to_string();
    info!("Deploying {} to {}", deployer.full_function_name(), target);

    deployer
        .init()
        .await
        .with_context(|| format!("Unable to initialize {} deployer", target))?;
    deployer.deploy().await?;

    if run_test {
        deployer.test().await?;
    }

    if !publish_gateway {
        return Ok(());
    }
    if !config.fastly.is_configured() {
        warn!("Fastly auth or service ID missing, skipping gateway");
        return Ok(());
    }

    let mut gateway = FastlyGateway::from_config(config).with_deployer(&deployer);
    let version = gateway.deploy().await.context("Gateway deployment failed")?;
    info!("Gateway live on version {}", version);
    Ok(())
}

async fn test(config: &Config) -> Result<()> {
    let deployer = GoogleDeployer::new(config)?;
    deployer.test().await?;
    Ok(())
}
