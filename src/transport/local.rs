//! In-process transport over a shared registry

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{error_body, status_for, ToolTransport, TransportError};
use crate::tools::ToolRegistry;

/// Transport that invokes a registry in the same process
#[derive(Debug, Clone)]
pub struct LocalToolTransport {
    registry: Arc<ToolRegistry>,
}

impl LocalToolTransport {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl ToolTransport for LocalToolTransport {
    async fn list_tools(&self) -> Result<Value, TransportError> {
        Ok(json!({ "tools": self.registry.list() }))
    }

    async fn call_tool(&self, tool_id: &str, input: Value) -> Result<Value, TransportError> {
        match self.registry.invoke(tool_id, input).await {
            Ok(outcome) => serde_json::to_value(outcome)
                .map_err(|e| TransportError::InvalidResponse(e.to_string())),
            Err(e) => Err(TransportError::Status {
                status: status_for(&e),
                body: error_body(&e),
            }),
        }
    }
}
