//! HTTP transport for the Shortcut REST API
//!
//! The [`Transport`] trait is the seam between request semantics (retries,
//! status mapping, body decoding) in [`super::ApiClient`] and the wire.
//! [`HttpTransport`] is the production implementation on top of `reqwest`.

use async_trait::async_trait;
use reqwest::{header, Client, Method};
use serde_json::Value;
use tracing::{debug, instrument};

use super::error::ShortcutResult;
use crate::config::ApiConfig;

/// Header carrying the API token
pub const TOKEN_HEADER: &str = "Shortcut-Token";

/// A response as it came off the wire, before any interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw `Retry-After` header value, if present
    pub retry_after: Option<String>,
    /// Response body text (possibly empty)
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns the raw response
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ShortcutResult<RawResponse>;
}

/// `reqwest`-backed transport with the token attached to every request
pub struct HttpTransport {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpTransport {
    pub fn new(config: &ApiConfig, token: impl Into<String>) -> ShortcutResult<Self> {
        let client = Client::builder().user_agent(&config.user_agent).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, body))]
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ShortcutResult<RawResponse> {
        let url = format!("{}{}", self.base_url, path);
        debug!("sending request to {}", url);

        let mut request = self
            .client
            .request(method, &url)
            .header(TOKEN_HEADER, &self.token)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        debug!(status, bytes = body.len(), "response received");

        Ok(RawResponse {
            status,
            retry_after,
            body,
        })
    }
}
