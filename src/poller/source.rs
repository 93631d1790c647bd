//! Telemetry Sources
//!
//! Where the poller gets its payloads from.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::error::{FetchError, FetchResult};
use crate::telemetry::Payload;

/// Path of the telemetry endpoint, relative to the base URL
pub const TELEMETRY_PATH: &str = "/telemetry";

/// Anything that can produce one payload per tick
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Human-readable description for logs
    fn describe(&self) -> String;

    /// Fetch the current payload
    async fn fetch(&self) -> FetchResult<Payload>;
}

/// Fetches payloads over HTTP with a single GET per call
pub struct HttpTelemetrySource {
    client: Client,
    url: String,
}

impl HttpTelemetrySource {
    /// Create a source for `{base_url}/telemetry`
    pub fn new(base_url: &str, request_timeout: Duration) -> FetchResult<Self> {
        let client = Client::builder().timeout(request_timeout).build()?;

        Ok(Self {
            client,
            url: telemetry_url(base_url),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TelemetrySource for HttpTelemetrySource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> FetchResult<Payload> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(FetchError::from_transport)?;

        // The body is parsed whatever the status; only its shape decides.
        let payload: Payload =
            serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
                status: status.as_u16(),
                source,
            })?;

        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                "Telemetry endpoint returned a non-success status with a payload body"
            );
        }

        Ok(payload)
    }
}

/// Join a base URL and the telemetry path
pub fn telemetry_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), TELEMETRY_PATH)
}
