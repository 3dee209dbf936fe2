// HTTP request and response bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::tools::ToolMetadata;

// POST /tools/call body
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ToolInvocationRequest {
    #[serde(default)]
    pub tool_id: Option<String>,
    #[serde(default = "empty_object")]
    pub input: Value,
}

impl ToolInvocationRequest {
    /// Lenient parse: anything that is not a JSON object counts as an empty body
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_else(|_| Self {
            tool_id: None,
            input: empty_object(),
        })
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

// GET /tools/list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolListResponse {
    pub tools: Vec<ToolMetadata>,
}

// Error response: {"error": <code or message>}
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

// POST /report body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub country: Option<String>,
}

// GET /report query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub country: Option<String>,
}

// Report Response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResponse {
    pub markdown: String,
}

// Tool server GET /health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolServerHealth {
    pub status: String,
    pub server: String,
    pub tools: usize,
    pub timestamp: DateTime<Utc>,
}

// Agent service GET /health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentHealth {
    pub status: String,
    pub model: String,
    pub tool_server: ToolServerStatus,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToolServerStatus {
    Reachable,
    Unreachable,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invocation_request_defaults_input() {
        let request = ToolInvocationRequest::from_body(br#"{"tool_id":"country/info"}"#);
        assert_eq!(request.tool_id.as_deref(), Some("country/info"));
        assert_eq!(request.input, json!({}));
    }

    #[test]
    fn test_invocation_request_unparseable_body_is_empty() {
        for body in [&b"not json"[..], b"", b"[1,2,3]", b"\"text\""] {
            let request = ToolInvocationRequest::from_body(body);
            assert_eq!(request.tool_id, None);
            assert_eq!(request.input, json!({}));
        }
    }

    #[test]
    fn test_invocation_request_keeps_explicit_input() {
        let request =
            ToolInvocationRequest::from_body(br#"{"tool_id":"x","input":{"name":"chile"}}"#);
        assert_eq!(request.input, json!({"name": "chile"}));
    }

    #[test]
    fn test_tool_server_status_serialization() {
        assert_eq!(
            serde_json::to_string(&ToolServerStatus::Reachable).unwrap(),
            r#""reachable""#
        );
        assert_eq!(
            serde_json::to_string(&ToolServerStatus::Unreachable).unwrap(),
            r#""unreachable""#
        );
    }

    #[test]
    fn test_report_request_deserialization() {
        let request: ReportRequest = serde_json::from_str(r#"{"country":"peru"}"#).unwrap();
        assert_eq!(request.country.as_deref(), Some("peru"));

        let request: ReportRequest = serde_json::from_str("{}").unwrap();
        assert!(request.country.is_none());
    }
}
