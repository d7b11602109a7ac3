//! HTTP client for the smart-home backend API
//!
//! One request per call, bearer authentication, fixed timeout, no retries.
//! Every failure mode (transport, status, body) comes back as a
//! [`GatewayError`]; turning it into a tool result is the caller's job.

use crate::config::BackendConfig;
use crate::error::{GatewayError, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// API root below the backend base URL
const API_PREFIX: [&str; 3] = ["api", "v1", "devices"];

/// HTTP client for the smart-home backend
#[derive(Debug, Clone)]
pub struct BackendHttpClient {
    /// HTTP client instance
    client: Client,

    /// Backend base URL
    base_url: Url,
}

impl BackendHttpClient {
    /// Create a new client from backend configuration
    ///
    /// The bearer header is only installed when a token is configured.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        if config.auth_token_configured() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", config.auth_token))
                .map_err(|e| {
                    GatewayError::invalid_input(format!("Invalid authorization header: {e}"))
                })?;
            value.set_sensitive(true);
            default_headers.insert(AUTHORIZATION, value);
        }

        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .user_agent(format!("smart-home-mcp/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(default_headers)
            .build()
            .map_err(|e| GatewayError::connection(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.url.clone(),
        })
    }

    /// Build a device API URL: `{base}/api/v1/devices/{segments..}/`
    ///
    /// Each segment is percent-encoded. Dot segments are dropped by URL
    /// normalization, so device ids pass through `device_segment` first.
    pub fn build_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| GatewayError::config(format!("Invalid base URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(API_PREFIX)
            .extend(segments)
            .push("");
        Ok(url)
    }

    /// `GET /api/v1/devices/overview/`
    pub async fn device_overview(&self) -> Result<Value> {
        let url = self.build_url(&["overview"])?;
        self.execute(self.client.get(url.clone()), url).await
    }

    /// `GET /api/v1/devices/{device_id}/detail/`
    pub async fn device_detail(&self, device_id: &str) -> Result<Value> {
        let url = self.build_url(&[device_segment(device_id)?, "detail"])?;
        self.execute(self.client.get(url.clone()), url).await
    }

    /// `POST /api/v1/devices/{device_id}/control/` with `{action, parameters}`
    pub async fn control_device<P: Serialize + ?Sized>(
        &self,
        device_id: &str,
        command: &P,
    ) -> Result<Value> {
        let url = self.build_url(&[device_segment(device_id)?, "control"])?;
        let request = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(command);
        self.execute(request, url).await
    }

    /// Send a request and decode the JSON body of a 2xx response
    async fn execute(&self, request: RequestBuilder, url: Url) -> Result<Value> {
        debug!("Backend request to {url}");

        let response = request.send().await.map_err(GatewayError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("Backend returned {status}: {body}");
            return Err(GatewayError::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(GatewayError::from_transport)?;
        debug!("Backend responded {status} ({} bytes)", body.len());
        parse_body(&body)
    }
}

/// Reject device ids that cannot survive as their own path segment
///
/// `""`, `"."` and `".."` would collapse into a neighbouring endpoint, and
/// percent-encoding the dots does not help: `%2E` is a dot segment too.
fn device_segment(device_id: &str) -> Result<&str> {
    match device_id {
        "" | "." | ".." => Err(GatewayError::invalid_input(format!(
            "device id '{device_id}' cannot be used as a URL path segment"
        ))),
        id => Ok(id),
    }
}

/// Decode a 2xx body; an empty body counts as an empty object
fn parse_body(body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    Ok(serde_json::from_str(body)?)
}
