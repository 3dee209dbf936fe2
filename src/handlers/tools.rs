// GET /tools/list and POST /tools/call handlers

use std::convert::Infallible;
use std::sync::Arc;

use bytes::Bytes;
use warp::http::StatusCode;

use super::{json_reply, JsonReply, ToolServerState};
use crate::models::{ToolInvocationRequest, ToolListResponse};
use crate::transport::{error_body, status_for};

pub async fn list_tools_handler(state: Arc<ToolServerState>) -> Result<JsonReply, Infallible> {
    let body = ToolListResponse {
        tools: state.registry.list(),
    };
    Ok(json_reply(StatusCode::OK, &body))
}

pub async fn call_tool_handler(
    body: Bytes,
    state: Arc<ToolServerState>,
) -> Result<JsonReply, Infallible> {
    let request = ToolInvocationRequest::from_body(&body);
    let tool_id = request.tool_id.unwrap_or_default();

    match state.registry.invoke(&tool_id, request.input).await {
        Ok(outcome) => {
            tracing::info!(tool_id = %tool_id, status = 200, "Tool invoked");
            Ok(json_reply(StatusCode::OK, &outcome))
        }
        Err(e) => {
            let status = status_for(&e);
            tracing::info!(tool_id = %tool_id, status, error = %e, "Tool invocation failed");
            let status =
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            Ok(json_reply(status, &error_body(&e)))
        }
    }
}
