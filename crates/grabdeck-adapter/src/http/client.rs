/*
[INPUT]:  HTTP configuration (base URL, timeouts)
[OUTPUT]: Configured reqwest client ready for download-service calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::http::{ClientError, Result};
use crate::types::ErrorBody;

/// Address the download service listens on when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP client for the download service REST API
#[derive(Debug, Clone)]
pub struct TaskClient {
    http_client: Client,
    base_url: Url,
}

impl TaskClient {
    /// Create a new client with default configuration
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(ClientConfig::default(), base_url)
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "base url cannot carry paths: {base_url}"
            )));
        }

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build full URL for an endpoint given as path segments.
    ///
    /// Segments are percent-encoded, so task ids never leak into the path
    /// structure.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Config(format!("invalid base url: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        Ok(self.http_client.request(method, url))
    }

    /// Send a request and decode a JSON body.
    ///
    /// Non-success statuses become [`ClientError::Api`], using the `error`
    /// field of the body when the service supplied one.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ErrorBody>(&body) {
                Ok(parsed) => parsed.error,
                Err(_) if body.trim().is_empty() => status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
                Err(_) => body,
            };
            return Err(ClientError::api_error(status, message));
        }

        if body.trim().is_empty() {
            return Err(ClientError::InvalidResponse("empty response body".to_string()));
        }

        Ok(serde_json::from_str(&body)?)
    }
}
