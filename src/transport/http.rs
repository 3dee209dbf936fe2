//! HTTP transport to a remote tool server

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};

use super::{ToolTransport, TransportError};

pub const LIST_TIMEOUT: Duration = Duration::from_secs(30);
pub const CALL_TIMEOUT: Duration = Duration::from_secs(60);
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_millis(1500);

const API_KEY_HEADER: &str = "x-api-key";

/// Transport that talks to a tool server's `/tools/*` endpoints
#[derive(Debug, Clone)]
pub struct HttpToolTransport {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl HttpToolTransport {
    /// Create a transport for the tool server at `base_url`
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, TransportError> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| TransportError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, TransportError> {
        let response = request
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !status.is_success() {
            let body = serde_json::from_str(&text).unwrap_or_else(|_| json!({ "error": text }));
            tracing::debug!(status = status.as_u16(), %body, "Tool server returned an error");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&text).map_err(|e| TransportError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ToolTransport for HttpToolTransport {
    async fn list_tools(&self) -> Result<Value, TransportError> {
        let request = self
            .http_client
            .get(self.url("/tools/list"))
            .timeout(LIST_TIMEOUT);
        self.send(request).await
    }

    async fn call_tool(&self, tool_id: &str, input: Value) -> Result<Value, TransportError> {
        let request = self
            .http_client
            .post(self.url("/tools/call"))
            .timeout(CALL_TIMEOUT)
            .json(&json!({ "tool_id": tool_id, "input": input }));
        self.send(request).await
    }

    async fn check_health(&self) -> bool {
        let result = self
            .http_client
            .get(self.url("/health"))
            .timeout(HEALTH_CHECK_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "Tool server health check failed");
                false
            }
        }
    }
}
