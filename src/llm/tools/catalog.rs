//! The two meta-tools presented to the model

use once_cell::sync::Lazy;
use serde_json::json;

use crate::llm::core::types::ToolDeclaration;

pub const LIST_TOOLS: &str = "list_tools";
pub const CALL_TOOL: &str = "call_tool";

static CATALOG: Lazy<Vec<ToolDeclaration>> = Lazy::new(|| {
    vec![
        ToolDeclaration {
            name: LIST_TOOLS.to_string(),
            description: "Discover available MCP tools and their schemas.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
        },
        ToolDeclaration {
            name: CALL_TOOL.to_string(),
            description: "Invoke an MCP tool by id with a JSON input object.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "tool_id": {"type": "string"},
                    "input": {"type": "object"}
                },
                "required": ["tool_id", "input"],
                "additionalProperties": false
            }),
        },
    ]
});

/// `list_tools` and `call_tool`, in that order
pub fn meta_tool_catalog() -> &'static [ToolDeclaration] {
    &CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_contents() {
        let catalog = meta_tool_catalog();
        let names: Vec<&str> = catalog.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["list_tools", "call_tool"]);
        assert_eq!(
            catalog[1].input_schema["required"],
            json!(["tool_id", "input"])
        );
    }

    #[test]
    fn test_catalog_is_shared() {
        assert!(std::ptr::eq(meta_tool_catalog(), meta_tool_catalog()));
    }
}
