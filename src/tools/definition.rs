//! Tool definitions and their public metadata

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::declaration::{create_input_schema, default_input_schema};

/// Version assigned to tools that do not declare one
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Type-erased async tool handler
pub type ToolHandler =
    Arc<dyn Fn(Value) -> BoxFuture<'static, Result<Value, String>> + Send + Sync>;

/// A registered tool: metadata plus the handler that executes it
///
/// Handlers only ever see input that already passed validation against
/// `input_schema`.
///
/// # Example
///
/// ```ignore
/// let tool = ToolDefinition::new("echo", |input| async move { Ok(input) })
///     .with_description("Return the input unchanged");
/// ```
#[derive(Clone)]
pub struct ToolDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub input_schema: Value,
    handler: ToolHandler,
}

impl ToolDefinition {
    /// Create a tool from an async handler over raw JSON
    ///
    /// The name is derived from the id (`country/info` becomes `Country Info`),
    /// the description defaults to the name, the version to
    /// [`DEFAULT_VERSION`] and the schema to any object.
    pub fn new<F, Fut>(id: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, String>> + Send + 'static,
    {
        let id = id.into();
        let name = display_name(&id);
        Self {
            description: name.clone(),
            name,
            id,
            version: DEFAULT_VERSION.to_string(),
            input_schema: default_input_schema(),
            handler: Arc::new(move |input| Box::pin(handler(input))),
        }
    }

    /// Create a tool from a synchronous handler over raw JSON
    pub fn from_fn<F>(id: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        // Deferred to poll time so a panicking handler is caught by the registry
        let handler = Arc::new(handler);
        Self::new(id, move |input| {
            let handler = Arc::clone(&handler);
            async move { handler(input) }
        })
    }

    /// Create a tool from an async function over typed arguments
    ///
    /// The input schema is generated from `Args`, arguments are deserialized
    /// from the validated input and the result is serialized back to JSON.
    pub fn typed<Args, R, E, F, Fut>(id: impl Into<String>, handler: F) -> Self
    where
        Args: DeserializeOwned + JsonSchema + Send + 'static,
        R: Serialize + Send + 'static,
        E: fmt::Display + Send + 'static,
        F: Fn(Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
    {
        let schema = create_input_schema::<Args>();
        Self::new(id, move |input: Value| {
            let future = match serde_json::from_value::<Args>(input) {
                Ok(args) => Ok(handler(args)),
                Err(e) => Err(format!("Failed to deserialize arguments: {}", e)),
            };

            run_typed(future)
        })
        .with_input_schema(schema)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_input_schema(mut self, input_schema: Value) -> Self {
        self.input_schema = input_schema;
        self
    }

    /// Public view of this tool, without the handler
    pub fn metadata(&self) -> ToolMetadata {
        ToolMetadata {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            version: self.version.clone(),
            input_schema: self.input_schema.clone(),
        }
    }

    /// Run the handler; callers are responsible for validating `input` first
    pub(crate) fn call(&self, input: Value) -> BoxFuture<'static, Result<Value, String>> {
        (self.handler)(input)
    }
}

async fn run_typed<R, E, Fut>(future: Result<Fut, String>) -> Result<Value, String>
where
    R: Serialize,
    E: fmt::Display,
    Fut: Future<Output = Result<R, E>>,
{
    let result = future?.await.map_err(|e| e.to_string())?;
    serde_json::to_value(result).map_err(|e| format!("Failed to serialize result: {}", e))
}

impl fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("version", &self.version)
            .field("input_schema", &self.input_schema)
            .finish_non_exhaustive()
    }
}

/// Tool metadata as exposed to callers of `list`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolMetadata {
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub input_schema: Value,
}

/// Title-case the words of a tool id: `weather_info` or `weather/info` -> `Weather Info`
fn display_name(id: &str) -> String {
    id.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
