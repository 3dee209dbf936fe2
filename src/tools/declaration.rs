//! Input schema helpers using JSON Schema generation

use schemars::{schema_for, JsonSchema};
use serde_json::Value;

/// Schema used when a tool does not declare one: any object
pub fn default_input_schema() -> Value {
    serde_json::json!({ "type": "object" })
}

/// Create an input schema from a type that implements JsonSchema
///
/// Doc comments on fields become `description`s, and
/// `#[serde(deny_unknown_fields)]` becomes `"additionalProperties": false`.
///
/// # Example
///
/// ```ignore
/// use schemars::JsonSchema;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, JsonSchema)]
/// #[serde(deny_unknown_fields)]
/// struct CountryArgs {
///     /// Country name, e.g. 'france'
///     name: String,
/// }
///
/// let schema = create_input_schema::<CountryArgs>();
/// ```
pub fn create_input_schema<T: JsonSchema>() -> Value {
    let schema = schema_for!(T);
    serde_json::to_value(&schema).unwrap_or_else(|_| default_input_schema())
}
