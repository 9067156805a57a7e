//! HTTP transport seam.
//!
//! The client never talks to `reqwest` directly; it goes through `Transport`
//! so that tests can script responses without a network.

use crate::error::{ProviderError, ProviderResult};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// A settled HTTP response: status code plus raw body text.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    pub fn json(&self) -> ProviderResult<Value> {
        serde_json::from_str(&self.body).map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

/// POSTs JSON bodies to provider endpoints.
///
/// Uses `async_trait` because the client holds an `Arc<dyn Transport>`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        timeout: Duration,
    ) -> ProviderResult<HttpResponse>;
}

/// `reqwest`-backed transport sharing one connection pool.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
        timeout: Duration,
    ) -> ProviderResult<HttpResponse> {
        let mut request = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body)
            .timeout(timeout);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        // Query-parameter keys live in the URL, so it never goes into messages.
        let resp = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    timeout_ms: timeout.as_millis() as u64,
                }
            } else {
                ProviderError::Transport(e.without_url().to_string())
            }
        })?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    timeout_ms: timeout.as_millis() as u64,
                }
            } else {
                ProviderError::Transport(e.without_url().to_string())
            }
        })?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_response_success_range() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(429, "").is_success());
        assert!(!HttpResponse::new(500, "").is_success());
    }

    #[test]
    fn test_http_response_json_decode_error() {
        let err = HttpResponse::new(200, "<html>").json().unwrap_err();
        assert!(matches!(err, ProviderError::Decode(_)));
    }
}
