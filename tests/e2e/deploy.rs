//! Real deployment to Google Cloud Functions and Fastly

#[cfg(test)]
mod tests {
    use crate::skip_without_env;
    use deploykit::{Config, Deployer, FastlyGateway, GoogleDeployer};

    #[tokio::test]
    #[ignore]
    async fn test_deploy_test_and_publish() {
        skip_without_env!("DEPLOYKIT_E2E_CONFIG");
        let path = std::env::var("DEPLOYKIT_E2E_CONFIG").unwrap();

        let config = Config::load(Some(std::path::Path::new(&path)))
            .await
            .expect("Failed to load E2E configuration");
        config.validate().expect("Invalid E2E configuration");

        let mut deployer = GoogleDeployer::new(&config).expect("Failed to create deployer");
        deployer.init().await.expect("Google authentication failed");
        deployer.deploy().await.expect("Google deployment failed");
        deployer.test().await.expect("Smoke test failed");

        if config.fastly.is_configured() {
            let mut gateway = FastlyGateway::from_config(&config).with_deployer(&deployer);
            let version = gateway.deploy().await.expect("Gateway deployment failed");
            assert!(version > 0);
        }
    }
}
