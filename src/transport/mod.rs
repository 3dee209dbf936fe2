//! Client side of the tool transport
//!
//! The agent reaches the tool registry through [`ToolTransport`], either over
//! HTTP ([`HttpToolTransport`]) or in-process ([`LocalToolTransport`]). Both
//! report registry failures with the same status codes and bodies the tool
//! server puts on the wire.

mod http;
mod local;

pub use http::HttpToolTransport;
pub use local::LocalToolTransport;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

use crate::tools::ToolError;

/// Errors surfaced by a [`ToolTransport`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    /// The tool server could not be reached or timed out
    #[error("tool server unreachable: {0}")]
    Network(String),

    /// The tool server answered with a non-success status
    #[error("MCP tool call failed {status}: {body}")]
    Status { status: u16, body: Value },

    /// The tool server answered 2xx with a body that is not JSON
    #[error("invalid response from tool server: {0}")]
    InvalidResponse(String),
}

/// Access to a tool registry's list and invoke operations
#[async_trait]
pub trait ToolTransport: Send + Sync {
    /// `{"tools": [ToolMetadata, ...]}`
    async fn list_tools(&self) -> Result<Value, TransportError>;

    /// `{"tool_id": ..., "result": ...}` on success
    async fn call_tool(&self, tool_id: &str, input: Value) -> Result<Value, TransportError>;

    /// Whether the tool server currently answers its health check
    async fn check_health(&self) -> bool {
        true
    }
}

#[async_trait]
impl<T: ToolTransport + ?Sized> ToolTransport for Arc<T> {
    async fn list_tools(&self) -> Result<Value, TransportError> {
        (**self).list_tools().await
    }

    async fn call_tool(&self, tool_id: &str, input: Value) -> Result<Value, TransportError> {
        (**self).call_tool(tool_id, input).await
    }

    async fn check_health(&self) -> bool {
        (**self).check_health().await
    }
}

/// HTTP status for a registry failure
pub fn status_for(error: &ToolError) -> u16 {
    match error {
        ToolError::ToolNotFound(_) => 404,
        ToolError::InvalidInput(_) => 400,
        ToolError::ExecutionFailed(_) => 500,
    }
}

/// Wire body for a registry failure: `{"error": <code>, "details"?: <diagnostic>}`
pub fn error_body(error: &ToolError) -> Value {
    match error.details() {
        Some(details) => json!({"error": error.code(), "details": details}),
        None => json!({"error": error.code()}),
    }
}
