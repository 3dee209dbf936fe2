// GET|POST /report handler

use std::convert::Infallible;
use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;
use warp::http::StatusCode;

use super::{json_reply, AgentState, JsonReply};
use crate::models::{ErrorResponse, ReportResponse};

pub async fn report_handler(
    country: Option<String>,
    state: Arc<AgentState>,
) -> Result<JsonReply, Infallible> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("report", %request_id);

    let reply = async move {
        match state.reports.generate(country.as_deref()).await {
            Ok(run) => {
                tracing::info!(
                    rounds = run.rounds,
                    total_tokens = run.usage.total_tokens,
                    "Report generated"
                );
                json_reply(
                    StatusCode::OK,
                    &ReportResponse {
                        markdown: run.content,
                    },
                )
            }
            Err(e) => {
                tracing::error!(error = %e, "Report generation failed");
                json_reply(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &ErrorResponse::new(e.to_string()),
                )
            }
        }
    }
    .instrument(span)
    .await;

    Ok(reply)
}
