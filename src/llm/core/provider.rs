//! Provider trait for LLM implementations

use async_trait::async_trait;

use super::{
    error::LlmError,
    types::{GenerateRequest, GenerateResponse},
};
use crate::llm::openai::{OpenAiClient, OpenAiConfig};

/// Main interface that all LLM provider implementations must satisfy
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate one complete assistant turn
    ///
    /// # Arguments
    /// * `request` - The generation request with messages, tools, and config
    ///
    /// # Returns
    /// The assistant message (text and/or tool calls), or an error if the request fails
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError>;

    /// Model identifier sent to the provider
    fn model_name(&self) -> &str;
}

/// Create an LLM provider for an OpenAI-compatible chat-completions endpoint
///
/// # Example
///
/// ```rust,no_run
/// use mcp_agent::llm::{create_provider, OpenAiConfig};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = create_provider(OpenAiConfig::new("sk-...", "deepseek-chat"))?;
/// assert_eq!(provider.model_name(), "deepseek-chat");
/// # Ok(())
/// # }
/// ```
pub fn create_provider(config: OpenAiConfig) -> Result<Box<dyn LlmProvider>, LlmError> {
    let client = OpenAiClient::new(config)?;
    Ok(Box::new(client))
}
