//! Tool executor trait

use async_trait::async_trait;
use serde_json::Value;

use crate::llm::core::types::ToolCall;

/// Trait for executing tool calls from the LLM
///
/// Implementations receive the call exactly as the model produced it, raw
/// argument text included, and return either a JSON result or an error
/// message. Errors never abort the agent loop; they are reported back to the
/// model as tool output.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Execute a tool call
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - Successful execution result
    /// * `Err(String)` - Error message describing what went wrong
    async fn execute(&self, call: &ToolCall) -> Result<Value, String>;
}
