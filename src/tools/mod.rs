//! Tool registry and built-in tool providers
//!
//! Tools are registered once at startup from an explicit provider list,
//! then the registry is shared read-only. Every invocation validates input
//! against the tool's declared JSON schema before the handler runs.

pub mod country;
pub mod declaration;
pub mod definition;
pub mod error;
pub mod provider;
pub mod registry;
pub mod upstream;
pub mod validation;
pub mod weather;

pub use declaration::{create_input_schema, default_input_schema};
pub use definition::{ToolDefinition, ToolHandler, ToolMetadata, DEFAULT_VERSION};
pub use error::{ProviderError, ToolError};
pub use provider::{builtin_providers, ToolProvider, BUILTIN_PROVIDERS};
pub use registry::{ToolInvocationResult, ToolRegistry};
pub use upstream::{UpstreamClient, UpstreamError};
pub use validation::{validate, ValidationError};
