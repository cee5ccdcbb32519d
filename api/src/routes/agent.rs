use std::convert::Infallible;

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{self, HeaderName};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use futures::StreamExt;
use relay_core::transport::session_or_default;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::extract::AppJson;
use crate::state::AppState;
use crate::transport::{MockTransport, collect_reply};

const X_ACCEL_BUFFERING: HeaderName = HeaderName::from_static("x-accel-buffering");

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/agent", post(invoke_agent))
        .route("/api/agent/stream", post(invoke_agent_stream))
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentRequest {
    /// Text forwarded to the agent verbatim
    pub input_text: String,
    /// Conversation session; defaults to "default-session"
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AgentResponse {
    pub success: bool,
    pub output: String,
}

impl AgentResponse {
    pub fn ok(output: String) -> Self {
        Self {
            success: true,
            output,
        }
    }
}

/// Reject blank input before it reaches the agent.
pub(crate) fn require_text<'a>(value: &'a str, field: &str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation {
            message: format!("{field} must not be empty"),
            field: Some(field.to_string()),
            docs_hint: None,
        });
    }
    Ok(trimmed)
}

/// Invoke the agent and return its full answer
#[utoipa::path(
    post,
    path = "/api/agent",
    request_body = AgentRequest,
    responses(
        (status = 200, description = "Collected agent answer", body = AgentResponse),
        (status = 400, description = "Invalid body or agent not configured", body = crate::error::ApiError),
        (status = 401, description = "Agent credentials missing", body = crate::error::ApiError),
        (status = 502, description = "Agent failed", body = crate::error::ApiError)
    ),
    tag = "agent"
)]
pub async fn invoke_agent(
    State(state): State<AppState>,
    AppJson(req): AppJson<AgentRequest>,
) -> Result<Json<AgentResponse>, AppError> {
    let input = require_text(&req.input_text, "inputText")?;
    let session_id = session_or_default(req.session_id.as_deref());
    let output = collect_reply(state.transport.as_ref(), input, session_id).await?;
    Ok(Json(AgentResponse::ok(output)))
}

/// Invoke the agent and stream text fragments as they arrive
#[utoipa::path(
    post,
    path = "/api/agent/stream",
    request_body = AgentRequest,
    responses(
        (status = 200, description = "Plain-text fragments, flushed as produced", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid body or agent not configured", body = crate::error::ApiError),
        (status = 401, description = "Agent credentials missing", body = crate::error::ApiError),
        (status = 502, description = "Agent failed before streaming started", body = crate::error::ApiError)
    ),
    tag = "agent"
)]
pub async fn invoke_agent_stream(
    State(state): State<AppState>,
    AppJson(req): AppJson<AgentRequest>,
) -> Result<Response, AppError> {
    let input = require_text(&req.input_text, "inputText")?;
    let session_id = session_or_default(req.session_id.as_deref());
    let source = if state.mock {
        tracing::debug!(session_id, "mock agent stream");
        Some(MockTransport::stream_events(input))
    } else {
        state.transport.invoke(input, session_id).await?
    };

    // Status is already sent once the body starts, so later faults go inline.
    let fragments = relay_core::stream(source).map(|item| {
        Ok::<_, Infallible>(match item {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!("Agent stream aborted: {}", err);
                format!("[Agent error] {err}")
            }
        })
    });

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
            (X_ACCEL_BUFFERING, "no"),
        ],
        Body::from_stream(fragments),
    )
        .into_response())
}
