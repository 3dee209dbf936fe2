// Route definitions for the tool server and the agent service

use std::convert::Infallible;
use std::sync::Arc;

use bytes::Bytes;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::handlers::{self, json_reply, AgentState, JsonReply, ToolServerState, Unauthorized};
use crate::models::{ErrorResponse, ReportQuery, ReportRequest};

/// Largest accepted request body
pub const MAX_BODY_BYTES: u64 = 1024 * 1024;

/// Rejection for bodies over [`MAX_BODY_BYTES`]
#[derive(Debug)]
pub struct BodyTooLarge;

impl warp::reject::Reject for BodyTooLarge {}

fn with_state<S: Send + Sync + 'static>(
    state: Arc<S>,
) -> impl Filter<Extract = (Arc<S>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&state))
}

/// Full body, refused early by `content-length` and again after reading
/// (chunked uploads carry no length)
fn limited_body() -> impl Filter<Extract = (Bytes,), Error = Rejection> + Clone {
    warp::header::optional::<u64>("content-length")
        .and_then(|length: Option<u64>| async move {
            match length {
                Some(length) if length > MAX_BODY_BYTES => {
                    Err(warp::reject::custom(BodyTooLarge))
                }
                _ => Ok(()),
            }
        })
        .untuple_one()
        .and(warp::body::bytes())
        .and_then(|body: Bytes| async move {
            if body.len() as u64 > MAX_BODY_BYTES {
                Err(warp::reject::custom(BodyTooLarge))
            } else {
                Ok(body)
            }
        })
}

/// `/tools/list`, `/tools/call` and `/health`
pub fn tool_server_routes(
    state: Arc<ToolServerState>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    let tools = warp::path("tools");

    // GET /tools/list
    let list = tools
        .and(warp::path("list"))
        .and(warp::path::end())
        .and(warp::get())
        .and(handlers::require_api_key(state.api_key.clone()))
        .and(with_state(Arc::clone(&state)))
        .and_then(handlers::list_tools_handler);

    // POST /tools/call; credential checked before the body is read
    let call = tools
        .and(warp::path("call"))
        .and(warp::path::end())
        .and(warp::post())
        .and(handlers::require_api_key(state.api_key.clone()))
        .and(limited_body())
        .and(with_state(Arc::clone(&state)))
        .and_then(handlers::call_tool_handler);

    // GET /health
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state))
        .and_then(handlers::tool_server_health_handler);

    list.or(call)
        .or(health)
        .recover(handle_rejection)
        .with(warp::trace::request())
}

/// `/report` and `/health`
pub fn agent_routes(
    state: Arc<AgentState>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    // GET /report?country=...
    let report_get = warp::path("report")
        .and(warp::path::end())
        .and(warp::get())
        .and(
            warp::query::<ReportQuery>()
                .or(warp::any().map(ReportQuery::default))
                .unify(),
        )
        .map(|query: ReportQuery| query.country)
        .and(with_state(Arc::clone(&state)))
        .and_then(handlers::report_handler);

    // POST /report {"country": ...}; an unreadable body means no country
    let report_post = warp::path("report")
        .and(warp::path::end())
        .and(warp::post())
        .and(limited_body())
        .map(|body: Bytes| {
            serde_json::from_slice::<ReportRequest>(&body)
                .unwrap_or_default()
                .country
        })
        .and(with_state(Arc::clone(&state)))
        .and_then(handlers::report_handler);

    // GET /health
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state))
        .and_then(handlers::agent_health_handler);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "POST"])
        .allow_headers(vec!["content-type"]);

    report_get
        .or(report_post)
        .or(health)
        .with(cors)
        .recover(handle_rejection)
        .with(warp::trace::request())
}

/// Convert rejections into JSON error bodies
pub async fn handle_rejection(err: Rejection) -> Result<JsonReply, Infallible> {
    let (status, code) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "not_found")
    } else if err.find::<Unauthorized>().is_some() {
        (StatusCode::UNAUTHORIZED, "unauthorized")
    } else if err.find::<BodyTooLarge>().is_some()
        || err.find::<warp::reject::PayloadTooLarge>().is_some()
    {
        (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed")
    } else if err.find::<warp::reject::InvalidHeader>().is_some() {
        (StatusCode::BAD_REQUEST, "bad_request")
    } else if err.find::<warp::cors::CorsForbidden>().is_some() {
        (StatusCode::FORBIDDEN, "forbidden")
    } else {
        tracing::error!(rejection = ?err, "Unhandled rejection");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
    };

    Ok(json_reply(status, &ErrorResponse::new(code)))
}
