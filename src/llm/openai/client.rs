//! Chat-completions client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};

use crate::llm::core::{
    error::LlmError,
    provider::LlmProvider,
    types::{GenerateRequest, GenerateResponse},
};

use super::mapper::{from_chat_response, to_chat_request};
use super::types::{ApiErrorResponse, ChatCompletionResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Connection settings for an OpenAI-compatible endpoint
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Bearer token
    pub api_key: String,
    /// API root; `/chat/completions` is appended
    pub base_url: String,
    /// Model identifier, e.g. `deepseek-chat`
    pub model: String,
    /// Overall request timeout; `None` waits as long as the server does
    pub timeout: Option<Duration>,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Client for chat-completions APIs with function calling (DeepSeek, OpenAI, ...)
pub struct OpenAiClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Endpoint settings
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or the HTTP client cannot be built.
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::AuthenticationError(
                "API key must not be empty".to_string(),
            ));
        }

        let mut builder = Client::builder().connect_timeout(Duration::from_secs(5));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().map_err(|e| LlmError::HttpError {
            status: 0,
            body: format!("Failed to create HTTP client: {}", e),
        })?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Build the endpoint URL
    fn build_endpoint_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Make a chat-completions request
    async fn make_request(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let chat_request = to_chat_request(&self.config.model, request);

        let url = self.build_endpoint_url();
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&chat_request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = retry_after(response.headers());
            let body = response.text().await.unwrap_or_default();
            return Err(map_error_status(status, body, retry_after));
        }

        let body = response.text().await?;
        let chat_response: ChatCompletionResponse = serde_json::from_str(&body)?;
        tracing::debug!(
            response_id = chat_response.id.as_deref().unwrap_or(""),
            "Chat completion received"
        );

        from_chat_response(chat_response)
    }
}

#[async_trait]
impl LlmProvider for OpenAiClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        self.make_request(request).await
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Map a non-success status to an error, using the API's error envelope when present
fn map_error_status(status: StatusCode, body: String, retry_after: Option<Duration>) -> LlmError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            LlmError::AuthenticationError(api_message(&body).unwrap_or(body))
        }
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded { retry_after },
        _ => match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(envelope) => {
                let error = envelope.error;
                let code = error
                    .code
                    .map(|code| match code {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .or(error.error_type)
                    .unwrap_or_else(|| status.as_u16().to_string());
                LlmError::ProviderError {
                    code,
                    message: error.message,
                }
            }
            Err(_) => LlmError::HttpError {
                status: status.as_u16(),
                body,
            },
        },
    }
}

fn api_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorResponse>(body)
        .ok()
        .map(|envelope| envelope.error.message)
}
