use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use relay_core::{ConfigError, TransportError};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured error response. Every error carries enough information for a
/// client to tell a configuration problem from an upstream one.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiError {
    /// Machine-readable error code (e.g. "validation_failed", "upstream_failed")
    pub error: String,
    /// Human-readable description of what went wrong
    pub message: String,
    /// Which field caused the error (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Request ID for tracing and debugging
    pub request_id: String,
    /// Hint about how to fix the request or deployment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_hint: Option<String>,
}

/// Error codes used across the API
pub mod codes {
    pub const VALIDATION_FAILED: &str = "validation_failed";
    pub const CONFIG_MISSING: &str = "config_missing";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const UPSTREAM_FAILED: &str = "upstream_failed";
}

/// Internal error type that converts to structured API responses
#[derive(Debug)]
pub enum AppError {
    /// Validation error (400)
    Validation {
        message: String,
        field: Option<String>,
        docs_hint: Option<String>,
    },
    /// Agent identifiers or endpoint missing from the deployment (400)
    Config(ConfigError),
    /// Agent credentials missing or rejected (401)
    Credentials(String),
    /// Agent service or transport failure (502)
    Upstream(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = uuid::Uuid::now_v7().to_string();

        let (status, api_error) = match self {
            AppError::Validation {
                message,
                field,
                docs_hint,
            } => (
                StatusCode::BAD_REQUEST,
                ApiError {
                    error: codes::VALIDATION_FAILED.to_string(),
                    message,
                    field,
                    request_id,
                    docs_hint,
                },
            ),
            AppError::Config(err) => {
                tracing::warn!("Agent configuration incomplete: {}", err);
                (
                    StatusCode::BAD_REQUEST,
                    ApiError {
                        error: codes::CONFIG_MISSING.to_string(),
                        message: err.to_string(),
                        field: None,
                        request_id,
                        docs_hint: Some(
                            "Set AGENT_ID, AGENT_ALIAS_ID and AGENT_ENDPOINT, or USE_MOCK_AGENT=true."
                                .to_string(),
                        ),
                    },
                )
            }
            AppError::Credentials(msg) => {
                tracing::warn!("Agent credentials rejected: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    ApiError {
                        error: codes::UNAUTHORIZED.to_string(),
                        message: "Agent credentials not configured".to_string(),
                        field: None,
                        request_id,
                        docs_hint: Some("Check AGENT_API_KEY.".to_string()),
                    },
                )
            }
            AppError::Upstream(msg) => {
                tracing::error!("Agent upstream error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    ApiError {
                        error: codes::UPSTREAM_FAILED.to_string(),
                        message: msg,
                        field: None,
                        request_id,
                        docs_hint: None,
                    },
                )
            }
        };

        (status, Json(api_error)).into_response()
    }
}

impl From<TransportError> for AppError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Config(config) => AppError::Config(config),
            TransportError::Credentials(msg) => AppError::Credentials(msg),
            TransportError::Upstream(msg) => AppError::Upstream(msg),
            err @ TransportError::Malformed(_) => AppError::Upstream(err.to_string()),
        }
    }
}
