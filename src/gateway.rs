//! Remote API access.
//!
//! [`RemoteGateway`] performs exactly one request per call and never retries;
//! callers decide what a [`TransportError`] means for them. [`HttpGateway`] is
//! the `reqwest` implementation used at runtime.

use crate::config::Config;
use crate::error::TransportError;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use url::Url;

/// One request/response exchange returning parsed JSON.
pub trait RemoteGateway {
    /// Fetch `resource` and parse its body as JSON.
    ///
    /// # Errors
    ///
    /// Network failures, non-success statuses and malformed bodies are all
    /// reported as [`TransportError`].
    async fn fetch(&self, resource: &Url) -> Result<Value, TransportError>;
}

/// [`RemoteGateway`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new(config: &Config) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(TransportError::Client)?;
        Ok(Self { client })
    }

    /// The underlying client, shared with the summarizers so they reuse its
    /// connection pool and timeout.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

impl RemoteGateway for HttpGateway {
    #[instrument(level = "debug", skip_all, fields(url = %resource))]
    async fn fetch(&self, resource: &Url) -> Result<Value, TransportError> {
        let t0 = Instant::now();
        let url = resource.to_string();

        let response = self
            .client
            .get(resource.clone())
            .send()
            .await
            .map_err(|source| TransportError::Network {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Non-success status");
            return Err(TransportError::Status { url, status });
        }

        let body = response
            .text()
            .await
            .map_err(|source| TransportError::Network {
                url: url.clone(),
                source,
            })?;
        let value = serde_json::from_str(&body)
            .map_err(|source| TransportError::Malformed { url, source })?;

        debug!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            bytes = body.len(),
            "Fetched resource"
        );
        Ok(value)
    }
}
