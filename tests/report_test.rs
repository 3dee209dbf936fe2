//! HTTP tests for the agent service routes

mod common;

use std::sync::Arc;

use serde_json::{json, Value};
use warp::http::StatusCode;

use common::{stub_registry, text_response, tool_calls_response, ScriptedProvider};
use mcp_agent::handlers::AgentState;
use mcp_agent::llm::{
    meta_tool_catalog, Agent, GenerationConfig, LlmError, LlmProvider, MessageRole,
    MetaToolExecutor,
};
use mcp_agent::report::{ReportService, SYSTEM_PROMPT};
use mcp_agent::routes::agent_routes;
use mcp_agent::transport::{HttpToolTransport, LocalToolTransport, ToolTransport};

fn agent_state(provider: Arc<dyn LlmProvider>, transport: Arc<dyn ToolTransport>) -> Arc<AgentState> {
    let agent = Agent::new(
        provider,
        Arc::new(MetaToolExecutor::new(Arc::clone(&transport))),
        meta_tool_catalog().to_vec(),
        GenerationConfig::default(),
        Some(SYSTEM_PROMPT.to_string()),
    );
    Arc::new(AgentState {
        reports: ReportService::new(agent),
        transport,
    })
}

fn local_transport() -> Arc<dyn ToolTransport> {
    Arc::new(LocalToolTransport::new(Arc::new(stub_registry(Arc::default()))))
}

fn body_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

/// Text of the user message in the first model request
fn first_user_prompt(provider: &ScriptedProvider) -> String {
    provider.requests()[0]
        .messages
        .iter()
        .find(|m| m.role == MessageRole::User)
        .and_then(|m| m.text_content())
        .unwrap()
}

#[tokio::test]
async fn test_get_report_with_country() {
    let provider = Arc::new(ScriptedProvider::ok(vec![
        tool_calls_response(&[("a", "list_tools", "{}")]),
        tool_calls_response(&[(
            "b",
            "call_tool",
            r#"{"tool_id":"country/info","input":{"name":"peru"}}"#,
        )]),
        text_response("# Peru\n\nCapital: Lima"),
    ]));
    let routes = agent_routes(agent_state(provider.clone(), local_transport()));

    let response = warp::test::request()
        .method("GET")
        .path("/report?country=peru")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response.body()),
        json!({"markdown": "# Peru\n\nCapital: Lima"})
    );
    assert_eq!(
        first_user_prompt(&provider),
        "Generate a Markdown report for the country: peru. Use only MCP tools you discover via list_tools() and call_tool(). Return the final Markdown only."
    );
    assert_eq!(provider.requests()[0].messages[0].text_content().as_deref(), Some(SYSTEM_PROMPT));
}

#[tokio::test]
async fn test_get_report_defaults_to_france() {
    for path in ["/report", "/report?country=", "/report?country=%20%20"] {
        let provider = Arc::new(ScriptedProvider::ok(vec![text_response("# France")]));
        let routes = agent_routes(agent_state(provider.clone(), local_transport()));

        let response = warp::test::request()
            .method("GET")
            .path(path)
            .reply(&routes)
            .await;

        assert_eq!(response.status(), StatusCode::OK, "path {}", path);
        assert!(first_user_prompt(&provider).contains("for the country: france."));
    }
}

#[tokio::test]
async fn test_post_report() {
    let provider = Arc::new(ScriptedProvider::ok(vec![text_response("# Chad")]));
    let routes = agent_routes(agent_state(provider.clone(), local_transport()));

    let response = warp::test::request()
        .method("POST")
        .path("/report")
        .json(&json!({"country": "  chad "}))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response.body())["markdown"], "# Chad");
    assert!(first_user_prompt(&provider).contains("for the country: chad."));
}

#[tokio::test]
async fn test_post_report_without_body_uses_default() {
    let provider = Arc::new(ScriptedProvider::ok(vec![text_response("# France")]));
    let routes = agent_routes(agent_state(provider.clone(), local_transport()));

    let response = warp::test::request()
        .method("POST")
        .path("/report")
        .body("not json")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(first_user_prompt(&provider).contains("for the country: france."));
}

#[tokio::test]
async fn test_llm_failure_is_reported_as_500() {
    let provider = Arc::new(ScriptedProvider::new(vec![Err(
        LlmError::AuthenticationError("Authentication Fails".to_string()),
    )]));
    let routes = agent_routes(agent_state(provider, local_transport()));

    let response = warp::test::request()
        .method("GET")
        .path("/report?country=france")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response.body());
    assert!(body["error"].as_str().unwrap().contains("Authentication Fails"));
}

#[tokio::test]
async fn test_health_reports_model_and_tool_server() {
    let provider = Arc::new(ScriptedProvider::ok(vec![]));
    let routes = agent_routes(agent_state(provider, local_transport()));

    let response = warp::test::request()
        .method("GET")
        .path("/health")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.body());
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model"], "scripted");
    assert_eq!(body["tool_server"], "reachable");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_health_with_unreachable_tool_server() {
    let provider = Arc::new(ScriptedProvider::ok(vec![]));
    let transport: Arc<dyn ToolTransport> =
        Arc::new(HttpToolTransport::new("http://127.0.0.1:9", "k").unwrap());
    let routes = agent_routes(agent_state(provider, transport));

    let response = warp::test::request()
        .method("GET")
        .path("/health")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response.body())["tool_server"], "unreachable");
}

#[tokio::test]
async fn test_cors_preflight_and_unknown_route() {
    let provider = Arc::new(ScriptedProvider::ok(vec![]));
    let routes = agent_routes(agent_state(provider, local_transport()));

    let response = warp::test::request()
        .method("OPTIONS")
        .path("/report")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));

    let response = warp::test::request()
        .method("GET")
        .path("/tools/list")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response.body()), json!({"error": "not_found"}));
}
