//! Deployer stand-in with fixed gateway properties

use async_trait::async_trait;
use deploykit::{Deployer, Result};

#[derive(Debug, Clone)]
pub struct StubDeployer {
    pub name: String,
    pub host: String,
    pub base_path: String,
    pub url_vcl: String,
    pub custom_vcl: String,
}

impl StubDeployer {
    pub fn new(name: &str, host: &str, base_path: &str, url_vcl: &str) -> Self {
        Self {
            name: name.to_string(),
            host: host.to_string(),
            base_path: base_path.to_string(),
            url_vcl: url_vcl.to_string(),
            custom_vcl: String::new(),
        }
    }
}

#[async_trait]
impl Deployer for StubDeployer {
    fn id(&self) -> &'static str {
        "stub"
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn ready(&self) -> bool {
        true
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    async fn init(&mut self) -> Result<()> {
        Ok(())
    }

    async fn deploy(&mut self) -> Result<()> {
        Ok(())
    }

    async fn test(&self) -> Result<()> {
        Ok(())
    }

    fn host(&self) -> String {
        self.host.clone()
    }

    fn base_path(&self) -> String {
        self.base_path.clone()
    }

    fn url_vcl(&self) -> String {
        self.url_vcl.clone()
    }

    fn custom_vcl(&self) -> String {
        self.custom_vcl.clone()
    }
}
