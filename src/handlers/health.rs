// GET /health handlers

use std::convert::Infallible;
use std::sync::Arc;

use chrono::Utc;
use warp::http::StatusCode;

use super::{json_reply, AgentState, JsonReply, ToolServerState};
use crate::models::{AgentHealth, ToolServerHealth, ToolServerStatus};

pub async fn tool_server_health_handler(
    state: Arc<ToolServerState>,
) -> Result<JsonReply, Infallible> {
    let body = ToolServerHealth {
        status: "healthy".to_string(),
        server: state.server_name.clone(),
        tools: state.registry.len(),
        timestamp: Utc::now(),
    };
    Ok(json_reply(StatusCode::OK, &body))
}

pub async fn agent_health_handler(state: Arc<AgentState>) -> Result<JsonReply, Infallible> {
    let tool_server = if state.transport.check_health().await {
        ToolServerStatus::Reachable
    } else {
        ToolServerStatus::Unreachable
    };

    let body = AgentHealth {
        status: "ok".to_string(),
        model: state.reports.model_name().to_string(),
        tool_server,
        timestamp: Utc::now(),
    };
    Ok(json_reply(StatusCode::OK, &body))
}
