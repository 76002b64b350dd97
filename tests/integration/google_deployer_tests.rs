//! Google Cloud Functions deploy flow against a mock API

#[cfg(test)]
mod tests {
    use crate::common::fixtures::{self, FULL_NAME};
    use crate::common::mocks::{self, OPERATION};
    use crate::{assert_err, assert_ok};
    use deploykit::core::providers::google::GoogleError;
    use deploykit::{DeployError, Deployer, GoogleDeployer};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{header_regex, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn initialized(server: &MockServer, archive: &tempfile::NamedTempFile) -> GoogleDeployer {
        let config = fixtures::config(server, archive.path());
        let mut deployer = assert_ok!(GoogleDeployer::new(&config));
        assert_ok!(deployer.init().await);
        deployer.with_test_retry_delay(Duration::from_millis(10))
    }

    #[tokio::test]
    async fn test_deploy_creates_missing_function() {
        let server = MockServer::start().await;
        let archive = fixtures::archive();
        mocks::mount_lookup(&server, 404).await;
        mocks::mount_google_deploy(&server).await;
        mocks::mount_update(&server, 0).await;

        let mut deployer = initialized(&server, &archive).await;
        assert_ok!(deployer.deploy().await);

        assert_eq!(
            deployer.upload_url(),
            Some(format!("{}/upload/signed", server.uri()).as_str())
        );
        assert_eq!(deployer.function_resource(), Some(fixtures::function_name().as_str()));
        assert_eq!(
            deployer.function_url(),
            Some(format!("{}/live/fn", server.uri()).as_str())
        );
    }

    #[tokio::test]
    async fn test_deploy_updates_existing_function() {
        let server = MockServer::start().await;
        let archive = fixtures::archive();
        mocks::mount_lookup(&server, 200).await;
        mocks::mount_upload(&server).await;
        mocks::mount_update(&server, 1).await;
        mocks::mount_create(&server, 0).await;
        mocks::mount_operation_done(&server).await;
        mocks::mount_iam(&server).await;

        let mut deployer = initialized(&server, &archive).await;
        assert_ok!(deployer.deploy().await);
    }

    #[tokio::test]
    async fn test_failed_existence_check_takes_create_branch() {
        let server = MockServer::start().await;
        let archive = fixtures::archive();
        mocks::mount_lookup(&server, 500).await;
        mocks::mount_google_deploy(&server).await;
        mocks::mount_update(&server, 0).await;

        let mut deployer = initialized(&server, &archive).await;
        assert_ok!(deployer.deploy().await);
    }

    #[tokio::test]
    async fn test_payload_sent_on_create() {
        let server = MockServer::start().await;
        let archive = fixtures::archive();
        mocks::mount_lookup(&server, 404).await;
        mocks::mount_google_deploy(&server).await;

        let mut deployer = initialized(&server, &archive).await;
        assert_ok!(deployer.deploy().await);

        let requests = server.received_requests().await.unwrap();
        let create = requests
            .iter()
            .find(|r| r.method.as_str() == "POST" && r.url.path().ends_with("/functions"))
            .expect("create request");
        let body: serde_json::Value = serde_json::from_slice(&create.body).unwrap();

        assert_eq!(body["name"], fixtures::function_name());
        assert_eq!(body["entryPoint"], "main");
        assert_eq!(body["runtime"], "nodejs18");
        assert_eq!(body["availableMemoryMb"], 256);
        assert_eq!(body["description"], "Greets callers");
        assert_eq!(body["labels"]["pkgversion"], "1_4_0");
        assert_eq!(body["environmentVariables"], json!({"GREETING": "hello"}));
        assert_eq!(body["httpsTrigger"], json!({}));
        assert_eq!(body["sourceUploadUrl"], format!("{}/upload/signed", server.uri()));
        assert_eq!(body["serviceAccountEmail"], "deploy@proj.iam.gserviceaccount.com");

        let upload = requests
            .iter()
            .find(|r| r.url.path() == "/upload/signed")
            .expect("upload request");
        assert!(upload.headers.get("authorization").is_none());
        assert_eq!(upload.body, b"PK\x03\x04fixture");
    }

    #[tokio::test]
    async fn test_operation_error_fails_deploy() {
        let server = MockServer::start().await;
        let archive = fixtures::archive();
        mocks::mount_lookup(&server, 404).await;
        mocks::mount_upload(&server).await;
        mocks::mount_create(&server, 1).await;
        Mock::given(method("GET"))
            .and(path(format!("/v1/{}", OPERATION)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": OPERATION,
                "done": true,
                "error": {
                    "code": 3,
                    "message": "Function failed on loading user code",
                    "details": [{"@type": "type.googleapis.com/google.rpc.DebugInfo", "detail": "SyntaxError"}]
                }
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!("/v1/{}:setIamPolicy", fixtures::function_name())))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut deployer = initialized(&server, &archive).await;
        let err = assert_err!(deployer.deploy().await);

        assert!(err.to_string().starts_with("Google deployment failed"));
        match err.root() {
            DeployError::Google(GoogleError::Operation { code, details, .. }) => {
                assert_eq!(*code, 3);
                assert_eq!(details.as_ref().map(|d| d.details.len()), Some(1));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(deployer.function_url().is_none());
    }

    #[tokio::test]
    async fn test_upload_failure_aborts_deploy() {
        let server = MockServer::start().await;
        let archive = fixtures::archive();
        Mock::given(method("POST"))
            .and(path(format!("/v1/{}/functions:generateUploadUrl", fixtures::location())))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {"code": 403, "message": "Permission denied", "status": "PERMISSION_DENIED"}
            })))
            .mount(&server)
            .await;
        mocks::mount_create(&server, 0).await;

        let mut deployer = initialized(&server, &archive).await;
        let err = assert_err!(deployer.deploy().await);
        match err.root() {
            DeployError::Google(e) => {
                assert_eq!(e.status_code(), Some(403));
                assert_eq!(
                    e.details().and_then(|d| d.status.as_deref()),
                    Some("PERMISSION_DENIED")
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_oversized_archive_is_rejected_locally() {
        let server = MockServer::start().await;
        let archive = fixtures::archive();
        archive.as_file().set_len(104_857_601).unwrap();

        let mut deployer = initialized(&server, &archive).await;
        let err = assert_err!(deployer.deploy().await);
        assert!(matches!(err.root(), DeployError::Validation(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_smoke_test_hits_live_url_with_trace_header() {
        let server = MockServer::start().await;
        let archive = fixtures::archive();
        mocks::mount_lookup(&server, 404).await;
        mocks::mount_google_deploy(&server).await;
        Mock::given(method("GET"))
            .and(path("/live/fn/_status_check/healthcheck.json"))
            .and(header_regex("X-Cloud-Trace-Context", r"^[0-9a-f]{32}/0;o=1$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let mut deployer = initialized(&server, &archive).await;
        assert_ok!(deployer.deploy().await);
        assert_ok!(deployer.test().await);
    }

    #[tokio::test]
    async fn test_smoke_test_retries_404_once() {
        let server = MockServer::start().await;
        let archive = fixtures::archive();
        mocks::mount_lookup(&server, 404).await;
        mocks::mount_google_deploy(&server).await;
        Mock::given(method("GET"))
            .and(path("/live/fn/_status_check/healthcheck.json"))
            .respond_with(ResponseTemplate::new(404))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/live/fn/_status_check/healthcheck.json"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut deployer = initialized(&server, &archive).await;
        assert_ok!(deployer.deploy().await);
        assert_ok!(deployer.test().await);
    }

    #[tokio::test]
    async fn test_smoke_test_fails_on_server_error() {
        let server = MockServer::start().await;
        let archive = fixtures::archive();
        mocks::mount_lookup(&server, 404).await;
        mocks::mount_google_deploy(&server).await;
        Mock::given(method("GET"))
            .and(path("/live/fn/_status_check/healthcheck.json"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let mut deployer = initialized(&server, &archive).await;
        assert_ok!(deployer.deploy().await);
        let err = assert_err!(deployer.test().await);
        assert!(matches!(err, DeployError::TestFailed(_)));
    }

    #[tokio::test]
    async fn test_before_deploy_uses_fallback_url() {
        let server = MockServer::start().await;
        let archive = fixtures::archive();
        let config = fixtures::config(&server, archive.path());
        let deployer = assert_ok!(GoogleDeployer::new(&config));

        assert_eq!(
            deployer.test_url(),
            format!(
                "https://us-central1-proj.cloudfunctions.net/{}/_status_check/healthcheck.json",
                FULL_NAME
            )
        );
    }

    #[tokio::test]
    async fn test_init_fails_without_credentials() {
        let server = MockServer::start().await;
        let archive = fixtures::archive();
        let mut config = fixtures::config(&server, archive.path());
        config.google.access_token = None;
        config.google.key_file = Some("missing-key.json".into());

        let mut deployer = assert_ok!(GoogleDeployer::new(&config));
        let err = assert_err!(deployer.init().await);
        assert!(matches!(err, DeployError::Google(GoogleError::Authentication(_))));
    }
}
