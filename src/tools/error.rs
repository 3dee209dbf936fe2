//! Error types for the tool registry

use thiserror::Error;

/// Failures produced by [`ToolRegistry::invoke`](super::ToolRegistry::invoke)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// No tool is registered under the requested id
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// Input did not conform to the tool's input schema
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The handler returned an error or panicked
    #[error("execution failed: {0}")]
    ExecutionFailed(String),
}

impl ToolError {
    /// Stable machine-readable code used on the wire
    pub fn code(&self) -> &'static str {
        match self {
            ToolError::ToolNotFound(_) => "tool_not_found",
            ToolError::InvalidInput(_) => "invalid_input",
            ToolError::ExecutionFailed(_) => "execution_failed",
        }
    }

    /// Human-readable diagnostic, if the error kind carries one on the wire
    pub fn details(&self) -> Option<&str> {
        match self {
            ToolError::ToolNotFound(_) => None,
            ToolError::InvalidInput(details) | ToolError::ExecutionFailed(details) => {
                Some(details)
            }
        }
    }
}

/// Error raised when a configured tool provider name is unknown
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tool provider '{name}' (available: {available})")]
pub struct ProviderError {
    pub name: String,
    pub available: String,
}
