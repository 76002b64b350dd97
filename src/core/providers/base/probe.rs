//! Post-deploy smoke test
//!
//! Shared by every deployer's `test()`.

use crate::utils::error::{DeployError, Result};
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// A single smoke-test request
#[derive(Debug, Clone)]
pub struct TestRequest {
    /// Full URL to probe
    pub url: String,
    /// Header used to tag the request for provider-side tracing
    pub id_header: &'static str,
    /// Value of `id_header`
    pub id: String,
    /// How many extra attempts a 404 may trigger
    pub retry_404: u32,
    /// Pause before retrying a 404
    pub retry_delay: Duration,
}

impl TestRequest {
    pub fn new(url: impl Into<String>, id_header: &'static str, id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            id_header,
            id: id.into(),
            retry_404: 1,
            retry_delay: Duration::from_secs(5),
        }
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}

/// Probe a freshly deployed function.
///
/// A 404 is retried up to `retry_404` times since new deployments take a
/// moment to propagate. Any other non-success status fails the test.
pub async fn test_request(client: &Client, request: &TestRequest) -> Result<StatusCode> {
    let mut retries_left = request.retry_404;

    loop {
        info!(url = %request.url, id = %request.id, "requesting");
        let start = Instant::now();

        let response = client
            .get(&request.url)
            .header(request.id_header, &request.id)
            .send()
            .await?;

        let status = response.status();
        let elapsed = start.elapsed();
        debug!(url = %request.url, status = status.as_u16(), ?elapsed, "response received");

        if status.is_success() {
            info!(
                id = %request.id,
                status = status.as_u16(),
                elapsed_ms = elapsed.as_millis() as u64,
                "smoke test passed"
            );
            return Ok(status);
        }

        if status == StatusCode::NOT_FOUND && retries_left > 0 {
            retries_left -= 1;
            warn!(url = %request.url, delay = ?request.retry_delay, "got 404, retrying");
            tokio::time::sleep(request.retry_delay).await;
            continue;
        }

        let body = response.text().await.unwrap_or_default();
        return Err(DeployError::test_failed(format!(
            "{} returned status {}: {}",
            request.url,
            status.as_u16(),
            body.chars().take(200).collect::<String>()
        )));
    }
}
