//! Executes `list_tools` / `call_tool` requests through a tool transport

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::catalog::{CALL_TOOL, LIST_TOOLS};
use super::executor::ToolExecutor;
use crate::llm::core::types::ToolCall;
use crate::transport::ToolTransport;

/// Bridges the model's meta-tool calls onto a [`ToolTransport`]
pub struct MetaToolExecutor<T> {
    transport: T,
}

impl<T: ToolTransport> MetaToolExecutor<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

/// `call_tool` arguments, leniently extracted
///
/// Malformed argument text counts as `{}`; a missing `tool_id` becomes the
/// empty string (which the registry reports as not found) and a missing or
/// null `input` becomes `{}`.
fn call_tool_args(raw: &str) -> (String, Value) {
    let args: Map<String, Value> = serde_json::from_str(raw).unwrap_or_default();

    let tool_id = match args.get("tool_id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    let input = match args.get("input") {
        None | Some(Value::Null) => Value::Object(Map::new()),
        Some(input) => input.clone(),
    };

    (tool_id, input)
}

#[async_trait]
impl<T: ToolTransport> ToolExecutor for MetaToolExecutor<T> {
    async fn execute(&self, call: &ToolCall) -> Result<Value, String> {
        match call.name.as_str() {
            LIST_TOOLS => self.transport.list_tools().await.map_err(|e| e.to_string()),
            CALL_TOOL => {
                let (tool_id, input) = call_tool_args(&call.arguments);
                tracing::info!(tool_call_id = %call.id, tool_id = %tool_id, "Invoking tool");
                self.transport
                    .call_tool(&tool_id, input)
                    .await
                    .map_err(|e| e.to_string())
            }
            other => Err(format!("Unknown function {}", other)),
        }
    }
}
