//! `wiremock` stand-ins for the Cloud Functions and Fastly APIs

use super::fixtures::{FASTLY_KEY, SERVICE_ID, function_name, location};
use serde_json::json;
use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const OPERATION: &str = "operations/op-1";

/// Signed upload URL plus the upload itself
pub async fn mount_upload(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(format!("/v1/{}/functions:generateUploadUrl", location())))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"uploadUrl": format!("{}/upload/signed", server.uri())})),
        )
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/upload/signed"))
        .and(header("content-type", "application/zip"))
        .and(header("x-goog-content-length-range", "0,104857600"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(server)
        .await;
}

/// Existence check answering with `status`
pub async fn mount_lookup(server: &MockServer, status: u16) {
    let response = match status {
        200 => ResponseTemplate::new(200)
            .set_body_json(json!({"name": function_name(), "status": "ACTIVE"})),
        404 => ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": 404, "message": "Function not found", "status": "NOT_FOUND"}
        })),
        other => ResponseTemplate::new(other).set_body_json(json!({
            "error": {"code": other, "message": "lookup failed", "status": "INTERNAL"}
        })),
    };

    Mock::given(method("GET"))
        .and(path(format!("/v1/{}", function_name())))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

/// Create (POST) expectation, `times` calls
pub async fn mount_create(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path(format!("/v1/{}/functions", location())))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"name": OPERATION, "done": false})),
        )
        .expect(times)
        .mount(server)
        .await;
}

/// Update (PATCH) expectation, `times` calls
pub async fn mount_update(server: &MockServer, times: u64) {
    Mock::given(method("PATCH"))
        .and(path(format!("/v1/{}", function_name())))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"name": OPERATION, "done": false})),
        )
        .expect(times)
        .mount(server)
        .await;
}

/// Operation poll finishing with the deployed function
pub async fn mount_operation_done(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/{}", OPERATION)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": OPERATION,
            "done": true,
            "response": {
                "@type": "type.googleapis.com/google.cloud.functions.v1.CloudFunction",
                "name": function_name(),
                "status": "ACTIVE",
                "httpsTrigger": {"url": format!("{}/live/fn", server.uri())}
            }
        })))
        .mount(server)
        .await;
}

/// IAM policy write
pub async fn mount_iam(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(format!("/v1/{}:setIamPolicy", function_name())))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bindings": [{"role": "roles/cloudfunctions.invoker", "members": ["allUsers"]}],
            "etag": "BwX="
        })))
        .expect(1)
        .mount(server)
        .await;
}

/// Everything after the existence check, for a create
pub async fn mount_google_deploy(server: &MockServer) {
    mount_upload(server).await;
    mount_create(server, 1).await;
    mount_operation_done(server).await;
    mount_iam(server).await;
}

/// Fastly version list plus clone of the active version (7 into 8)
pub async fn mount_fastly_versions(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("/service/{}/version", SERVICE_ID)))
        .and(header("Fastly-Key", FASTLY_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"number": 6, "active": false},
            {"number": 7, "active": true}
        ])))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("/service/{}/version/7/clone", SERVICE_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"number": 8})))
        .expect(1)
        .mount(server)
        .await;
}

/// Accept every resource POST on the draft version
pub async fn mount_fastly_writes(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path_regex(format!(
            r"^/service/{}/version/8/(condition|healthcheck|backend|snippet)$",
            SERVICE_ID
        )))
        .and(header("Fastly-Key", FASTLY_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(server)
        .await;
}

/// Activation of the draft version, `times` calls
pub async fn mount_fastly_activate(server: &MockServer, times: u64) {
    Mock::given(method("PUT"))
        .and(path(format!("/service/{}/version/8/activate", SERVICE_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"number": 8, "active": true})))
        .expect(times)
        .mount(server)
        .await;
}
