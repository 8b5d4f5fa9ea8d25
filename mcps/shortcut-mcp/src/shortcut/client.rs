//! Shortcut API client
//!
//! Wraps a [`Transport`] with rate-limit backoff and response interpretation:
//!
//! - HTTP 429 sleeps for `Retry-After` seconds (or the configured default)
//!   and retries, up to `max_retries` times
//! - any other non-2xx becomes [`ShortcutError::Upstream`]
//! - an empty 2xx body becomes `Value::Null`
//! - a non-JSON 2xx body is returned as `Value::String`

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::error::{ShortcutError, ShortcutResult};
use super::transport::{RawResponse, Transport};
use crate::config::RateLimitConfig;

/// Client for the Shortcut REST API
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    max_retries: u32,
    default_retry_after: Duration,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, limits: &RateLimitConfig) -> Self {
        Self {
            transport,
            max_retries: limits.max_retries,
            default_retry_after: Duration::from_secs(limits.default_retry_after_seconds),
        }
    }

    /// Issue a request and interpret the response
    #[instrument(skip(self, body))]
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ShortcutResult<Value> {
        let mut retries = 0;

        loop {
            let response = self.transport.send(method.clone(), path, body).await?;

            if response.status == 429 {
                if retries >= self.max_retries {
                    warn!(attempts = retries + 1, "rate limit retries exhausted");
                    return Err(ShortcutError::RateLimited {
                        attempts: retries + 1,
                    });
                }
                retries += 1;

                let delay = self.retry_delay(&response);
                warn!(
                    delay_secs = delay.as_secs(),
                    retry = retries,
                    "rate limited, backing off"
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            return interpret(response);
        }
    }

    pub async fn get(&self, path: &str) -> ShortcutResult<Value> {
        self.call(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> ShortcutResult<Value> {
        self.call(Method::POST, path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> ShortcutResult<Value> {
        self.call(Method::PUT, path, Some(body)).await
    }

    /// GET and decode into a typed entity; a 404 becomes [`ShortcutError::NotFound`]
    pub async fn get_as<T: DeserializeOwned>(&self, path: &str) -> ShortcutResult<T> {
        let value = match self.get(path).await {
            Ok(value) => value,
            Err(ShortcutError::Upstream { status: 404, .. }) => {
                return Err(ShortcutError::NotFound(path.to_string()))
            }
            Err(e) => return Err(e),
        };
        Ok(serde_json::from_value(value)?)
    }

    fn retry_delay(&self, response: &RawResponse) -> Duration {
        response
            .retry_after
            .as_deref()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(self.default_retry_after)
    }
}

fn interpret(response: RawResponse) -> ShortcutResult<Value> {
    if !response.is_success() {
        return Err(ShortcutError::Upstream {
            status: response.status,
            body: response.body,
        });
    }

    if response.body.trim().is_empty() {
        debug!(status = response.status, "empty response body");
        return Ok(Value::Null);
    }

    match serde_json::from_str(&response.body) {
        Ok(value) => Ok(value),
        Err(_) => Ok(Value::String(response.body)),
    }
}
