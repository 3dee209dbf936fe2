//! Tool registry: registration, listing and validated invocation

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::definition::{ToolDefinition, ToolMetadata};
use super::error::ToolError;
use super::provider::ToolProvider;
use super::validation::validate;

/// Successful outcome of [`ToolRegistry::invoke`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocationResult {
    pub tool_id: String,
    pub result: Value,
}

/// Registry of tools keyed by id
///
/// Populated through `&mut self` during startup, then shared read-only
/// (typically behind an `Arc`). Listing order is registration order; a
/// duplicate id replaces the earlier definition in place.
///
/// # Example
///
/// ```ignore
/// let mut registry = ToolRegistry::new();
/// registry.register(
///     ToolDefinition::from_fn("echo", Ok)
///         .with_input_schema(json!({"type": "object", "required": ["text"]})),
/// );
///
/// let outcome = registry.invoke("echo", json!({"text": "hi"})).await?;
/// ```
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDefinition>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from an explicit list of providers, in order
    pub fn from_providers(providers: &[Box<dyn ToolProvider>]) -> Self {
        let mut registry = Self::new();
        for provider in providers {
            let before = registry.len();
            provider.register(&mut registry);
            tracing::info!(
                provider = provider.name(),
                added = registry.len() - before,
                "Registered tools from provider"
            );
        }
        registry
    }

    /// Add a tool, replacing any tool already registered under the same id
    pub fn register(&mut self, definition: ToolDefinition) {
        match self.index.get(&definition.id) {
            Some(&position) => {
                tracing::warn!(tool_id = %definition.id, "Tool re-registered, replacing previous definition");
                self.tools[position] = definition;
            }
            None => {
                self.index.insert(definition.id.clone(), self.tools.len());
                self.tools.push(definition);
            }
        }
    }

    /// Metadata of every registered tool, in registration order
    pub fn list(&self) -> Vec<ToolMetadata> {
        self.tools.iter().map(ToolDefinition::metadata).collect()
    }

    /// Ids of every registered tool, in registration order
    pub fn ids(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.id.as_str()).collect()
    }

    /// Look up a tool by id
    pub fn get(&self, tool_id: &str) -> Option<&ToolDefinition> {
        self.index.get(tool_id).map(|&position| &self.tools[position])
    }

    /// Check if a tool is registered
    pub fn contains(&self, tool_id: &str) -> bool {
        self.index.contains_key(tool_id)
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Validate `input` against the tool's schema and run its handler
    ///
    /// The handler is never called for input that fails validation. Handler
    /// errors and panics are reported as [`ToolError::ExecutionFailed`].
    pub async fn invoke(
        &self,
        tool_id: &str,
        input: Value,
    ) -> Result<ToolInvocationResult, ToolError> {
        let tool = self
            .get(tool_id)
            .ok_or_else(|| ToolError::ToolNotFound(tool_id.to_string()))?;

        if let Err(e) = validate(&tool.input_schema, &input) {
            tracing::debug!(tool_id, error = %e, "Rejected tool input");
            return Err(ToolError::InvalidInput(e.to_string()));
        }

        // Handlers may panic before yielding a future, so the call itself
        // runs inside the guard.
        let outcome = AssertUnwindSafe(async move { tool.call(input).await })
            .catch_unwind()
            .await;
        match outcome {
            Ok(Ok(result)) => Ok(ToolInvocationResult {
                tool_id: tool_id.to_string(),
                result,
            }),
            Ok(Err(message)) => {
                tracing::warn!(tool_id, error = %message, "Tool execution failed");
                Err(ToolError::ExecutionFailed(message))
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                tracing::error!(tool_id, error = %message, "Tool handler panicked");
                Err(ToolError::ExecutionFailed(message))
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("handler panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("handler panicked: {}", message)
    } else {
        "handler panicked".to_string()
    }
}
