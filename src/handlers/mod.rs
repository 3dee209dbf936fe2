// Handlers module

pub mod auth;
pub mod health;
pub mod report;
pub mod tools;

pub use auth::{require_api_key, ApiKey, Unauthorized};
pub use health::{agent_health_handler, tool_server_health_handler};
pub use report::report_handler;
pub use tools::{call_tool_handler, list_tools_handler};

use std::sync::Arc;

use serde::Serialize;
use warp::http::StatusCode;

use crate::report::ReportService;
use crate::tools::ToolRegistry;
use crate::transport::ToolTransport;

/// JSON body with an explicit status, the reply type of every handler
pub type JsonReply = warp::reply::WithStatus<warp::reply::Json>;

pub fn json_reply<T: Serialize>(status: StatusCode, body: &T) -> JsonReply {
    warp::reply::with_status(warp::reply::json(body), status)
}

/// Shared state of the tool server
pub struct ToolServerState {
    pub registry: Arc<ToolRegistry>,
    pub api_key: ApiKey,
    pub server_name: String,
}

/// Shared state of the agent service
pub struct AgentState {
    pub reports: ReportService,
    /// Same transport the agent uses, kept for health checks
    pub transport: Arc<dyn ToolTransport>,
}
