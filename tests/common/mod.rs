#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use mcp_agent::handlers::{ApiKey, ToolServerState};
use mcp_agent::llm::{
    FinishReason, GenerateRequest, GenerateResponse, LlmError, LlmProvider, Message, ToolCall,
    UsageMetadata,
};
use mcp_agent::tools::{ToolDefinition, ToolRegistry};

pub const TEST_API_KEY: &str = "test-key";

/// Input schema of the stub `country/info` tool
pub fn country_schema() -> Value {
    json!({
        "type": "object",
        "properties": {"name": {"type": "string", "description": "e.g. 'france'"}},
        "required": ["name"],
        "additionalProperties": false
    })
}

/// Registry with a stub `country/info` whose handler counts its calls
pub fn stub_registry(calls: Arc<AtomicUsize>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(
        ToolDefinition::from_fn("country/info", move |input| {
            calls.fetch_add(1, Ordering::SeqCst);
            let name = input["name"].as_str().unwrap_or_default();
            Ok(json!({
                "name": capitalize(name),
                "capital": "Paris",
                "region": "Europe"
            }))
        })
        .with_name("Country Info")
        .with_description("Get structured information about a country by name")
        .with_input_schema(country_schema()),
    );
    registry.register(
        ToolDefinition::from_fn("flaky/tool", |_| Err("upstream returned 503".to_string()))
            .with_description("Always fails"),
    );
    registry
}

pub fn tool_server_state(registry: ToolRegistry) -> Arc<ToolServerState> {
    Arc::new(ToolServerState {
        registry: Arc::new(registry),
        api_key: ApiKey::new(TEST_API_KEY),
        server_name: "Test Server".to_string(),
    })
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Response carrying only tool calls: `(id, name, arguments)`
pub fn tool_calls_response(calls: &[(&str, &str, &str)]) -> GenerateResponse {
    GenerateResponse {
        message: Message::assistant_tool_calls(
            calls
                .iter()
                .map(|(id, name, args)| ToolCall::new(*id, *name, *args))
                .collect(),
        ),
        finish_reason: FinishReason::ToolUse,
        usage: Some(UsageMetadata::new(10, 5)),
    }
}

/// Final text response
pub fn text_response(text: &str) -> GenerateResponse {
    GenerateResponse {
        message: Message::assistant(text),
        finish_reason: FinishReason::Stop,
        usage: Some(UsageMetadata::new(10, 5)),
    }
}

/// LLM provider that replays scripted responses and records every request
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<GenerateResponse, LlmError>>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<Result<GenerateResponse, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn ok(responses: Vec<GenerateResponse>) -> Self {
        Self::new(responses.into_iter().map(Ok).collect())
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::InvalidResponse("script exhausted".to_string())))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Provider that requests `list_tools` forever
pub struct LoopingProvider {
    calls: AtomicUsize,
}

impl LoopingProvider {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for LoopingProvider {
    async fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let id = format!("call_{}", n);
        Ok(tool_calls_response(&[(id.as_str(), "list_tools", "{}")]))
    }

    fn model_name(&self) -> &str {
        "looping"
    }
}

/// RestCountries record for France as served by v3.1
pub fn france_record() -> Value {
    json!([{
        "name": {"common": "France", "official": "French Republic"},
        "capital": ["Paris"],
        "region": "Europe",
        "subregion": "Western Europe",
        "population": 67391582,
        "area": 551695.0,
        "languages": {"fra": "French"},
        "currencies": {"EUR": {"name": "Euro", "symbol": "€"}},
        "flag": "🇫🇷",
        "maps": {"googleMaps": "https://goo.gl/maps/g7QxxSFsWyTPKuzd7"},
        "borders": ["AND", "BEL", "DEU", "ITA", "LUX", "MCO", "ESP", "CHE"]
    }])
}

/// Open-Meteo geocoding hit for Paris
pub fn paris_geocoding() -> Value {
    json!({
        "results": [{
            "id": 2988507,
            "name": "Paris",
            "latitude": 48.85341,
            "longitude": 2.3488,
            "timezone": "Europe/Paris",
            "country": "France"
        }]
    })
}
