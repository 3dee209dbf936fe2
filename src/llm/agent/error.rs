use crate::llm::core::error::LlmError;

/// Errors that can occur during agent execution
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Error from the LLM provider
    #[error("LLM error: {0}")]
    UpstreamModel(#[from] LlmError),

    /// The model kept requesting tools past the round cap
    #[error("Maximum tool rounds exceeded ({0})")]
    MaxIterationsExceeded(usize),
}
