//! Test fixtures
//!
//! Configurations point every API base at a local mock server.

use deploykit::Config;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use wiremock::MockServer;

pub const PROJECT: &str = "proj";
pub const REGION: &str = "us-central1";
pub const FULL_NAME: &str = "my_package--hello_1_4_0";
pub const SERVICE_ID: &str = "svc";
pub const FASTLY_KEY: &str = "fastly-secret";

/// `projects/proj/locations/us-central1`
pub fn location() -> String {
    format!("projects/{}/locations/{}", PROJECT, REGION)
}

/// Resource name of the fixture function
pub fn function_name() -> String {
    format!("{}/functions/{}", location(), FULL_NAME)
}

/// A small ZIP-like archive on disk
pub fn archive() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create archive");
    file.write_all(b"PK\x03\x04fixture").expect("write archive");
    file
}

/// Complete configuration talking to `server`
pub fn config(server: &MockServer, archive: &Path) -> Config {
    let mut config = Config::default();

    config.function.name = "hello@1.4.0".to_string();
    config.function.package_name = "my.package".to_string();
    config.function.version = "1.4.0".to_string();
    config.function.description = "Greets callers".to_string();
    config.function.archive = Some(archive.to_path_buf());
    config.function.test_path = "/_status_check/healthcheck.json".to_string();
    config.function.params.insert("GREETING".to_string(), "hello".to_string());

    config.google.email = Some("deploy@proj.iam.gserviceaccount.com".to_string());
    config.google.project_id = Some(PROJECT.to_string());
    config.google.region = REGION.to_string();
    config.google.access_token = Some("ya29.fixture".to_string());
    config.google.api_base = format!("{}/v1", server.uri());
    config.google.operation_poll_seconds = 1;
    config.google.operation_timeout_seconds = 5;

    config.fastly.auth = Some(FASTLY_KEY.to_string());
    config.fastly.service_id = Some(SERVICE_ID.to_string());
    config.fastly.checkpath = "/health".to_string();
    config.fastly.api_base = server.uri();

    config.http.timeout_seconds = 5;
    config
}
