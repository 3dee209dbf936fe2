//! HTTP tests for the tool server routes

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};
use warp::http::StatusCode;

use common::{stub_registry, tool_server_state, TEST_API_KEY};
use mcp_agent::routes::{tool_server_routes, MAX_BODY_BYTES};

fn body_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn test_list_tools_with_wrong_key_is_unauthorized() {
    let routes = tool_server_routes(tool_server_state(stub_registry(Arc::default())));

    let response = warp::test::request()
        .method("GET")
        .path("/tools/list")
        .header("x-api-key", "wrong")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response.body()), json!({"error": "unauthorized"}));
}

#[tokio::test]
async fn test_list_tools_with_correct_key() {
    let routes = tool_server_routes(tool_server_state(stub_registry(Arc::default())));

    let response = warp::test::request()
        .method("GET")
        .path("/tools/list")
        .header("x-api-key", TEST_API_KEY)
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.body());
    let tools = body["tools"].as_array().unwrap();
    assert!(tools.iter().any(|t| t["id"] == "country/info"));

    for tool in tools {
        let keys: Vec<&String> = tool.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 5, "unexpected fields in {}", tool);
        for key in ["id", "name", "description", "version", "input_schema"] {
            assert!(tool.get(key).is_some());
        }
    }
}

#[tokio::test]
async fn test_list_tools_accepts_query_key() {
    let routes = tool_server_routes(tool_server_state(stub_registry(Arc::default())));

    let response = warp::test::request()
        .method("GET")
        .path(&format!("/tools/list?key={}", TEST_API_KEY))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_call_tool_success() {
    let calls = Arc::new(AtomicUsize::new(0));
    let routes = tool_server_routes(tool_server_state(stub_registry(calls.clone())));

    let response = warp::test::request()
        .method("POST")
        .path("/tools/call")
        .header("x-api-key", TEST_API_KEY)
        .json(&json!({"tool_id": "country/info", "input": {"name": "france"}}))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.body());
    assert_eq!(body["tool_id"], "country/info");
    assert_eq!(body["result"]["name"], "France");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_call_tool_invalid_input() {
    let calls = Arc::new(AtomicUsize::new(0));
    let routes = tool_server_routes(tool_server_state(stub_registry(calls.clone())));

    let response = warp::test::request()
        .method("POST")
        .path("/tools/call")
        .header("x-api-key", TEST_API_KEY)
        .json(&json!({"tool_id": "country/info", "input": {}}))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response.body());
    assert_eq!(body["error"], "invalid_input");
    assert!(body["details"].as_str().unwrap().contains("'name' is a required property"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_call_tool_missing_input_defaults_to_empty_object() {
    let routes = tool_server_routes(tool_server_state(stub_registry(Arc::default())));

    let response = warp::test::request()
        .method("POST")
        .path("/tools/call")
        .header("x-api-key", TEST_API_KEY)
        .json(&json!({"tool_id": "country/info"}))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_call_unknown_tool() {
    let routes = tool_server_routes(tool_server_state(stub_registry(Arc::default())));

    for body in [
        json!({"tool_id": "x", "input": {}}),
        json!({"tool_id": "x", "input": {"name": "france"}}),
        json!({}),
    ] {
        let response = warp::test::request()
            .method("POST")
            .path("/tools/call")
            .header("x-api-key", TEST_API_KEY)
            .json(&body)
            .reply(&routes)
            .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response.body()), json!({"error": "tool_not_found"}));
    }
}

#[tokio::test]
async fn test_call_tool_unparseable_body_is_not_found() {
    let routes = tool_server_routes(tool_server_state(stub_registry(Arc::default())));

    let response = warp::test::request()
        .method("POST")
        .path("/tools/call")
        .header("x-api-key", TEST_API_KEY)
        .body("this is not json")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_call_tool_execution_failure() {
    let routes = tool_server_routes(tool_server_state(stub_registry(Arc::default())));

    let response = warp::test::request()
        .method("POST")
        .path("/tools/call")
        .header("x-api-key", TEST_API_KEY)
        .json(&json!({"tool_id": "flaky/tool", "input": {}}))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response.body()),
        json!({"error": "execution_failed", "details": "upstream returned 503"})
    );
}

#[tokio::test]
async fn test_unauthenticated_call_never_reaches_registry() {
    let calls = Arc::new(AtomicUsize::new(0));
    let routes = tool_server_routes(tool_server_state(stub_registry(calls.clone())));

    // Input that would fail validation must still be reported as 401
    for body in [
        json!({"tool_id": "country/info", "input": {}}),
        json!({"tool_id": "country/info", "input": {"name": "france"}}),
        json!({"tool_id": "missing"}),
    ] {
        let response = warp::test::request()
            .method("POST")
            .path("/tools/call")
            .json(&body)
            .reply(&routes)
            .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response.body()), json!({"error": "unauthorized"}));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let routes = tool_server_routes(tool_server_state(stub_registry(Arc::default())));
    let padding = "x".repeat(MAX_BODY_BYTES as usize + 1);

    let response = warp::test::request()
        .method("POST")
        .path("/tools/call")
        .header("x-api-key", TEST_API_KEY)
        .json(&json!({"tool_id": "country/info", "input": {"name": padding}}))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_health_needs_no_key() {
    let routes = tool_server_routes(tool_server_state(stub_registry(Arc::default())));

    let response = warp::test::request()
        .method("GET")
        .path("/health")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.body());
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["server"], "Test Server");
    assert_eq!(body["tools"], 2);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_unknown_route_and_wrong_method() {
    let routes = tool_server_routes(tool_server_state(stub_registry(Arc::default())));

    let response = warp::test::request()
        .method("GET")
        .path("/nope")
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response.body()), json!({"error": "not_found"}));

    let response = warp::test::request()
        .method("GET")
        .path("/tools/call")
        .header("x-api-key", TEST_API_KEY)
        .reply(&routes)
        .await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_reregistered_tool_is_listed_once() {
    use mcp_agent::tools::ToolDefinition;

    let mut registry = stub_registry(Arc::default());
    registry.register(
        ToolDefinition::from_fn("country/info", Ok)
            .with_version("2.0.0")
            .with_input_schema(common::country_schema()),
    );
    let routes = tool_server_routes(tool_server_state(registry));

    let response = warp::test::request()
        .method("GET")
        .path("/tools/list")
        .header("x-api-key", TEST_API_KEY)
        .reply(&routes)
        .await;

    let body = body_json(response.body());
    let matches: Vec<&Value> = body["tools"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|t| t["id"] == "country/info")
        .collect();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["version"], "2.0.0");
}
