use std::net::SocketAddr;

use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod extract;
mod middleware;
mod routes;
mod state;
mod transport;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Relay API",
        version = "0.1.0",
        description = "Relays questions to a conversational agent and returns its answers, streamed or normalized into fixed report sections."
    ),
    paths(
        routes::health::health_check,
        routes::agent::invoke_agent,
        routes::agent::invoke_agent_stream,
        routes::dispatch::dispatch_agent,
    ),
    components(schemas(
        HealthResponse,
        error::ApiError,
        routes::agent::AgentRequest,
        routes::agent::AgentResponse,
        routes::dispatch::DispatchRequest,
        routes::dispatch::AnswerLevel,
    )),
    tags(
        (name = "system", description = "Service status"),
        (name = "agent", description = "Agent invocation")
    )
)]
struct ApiDoc;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// True when answers come from the built-in mock agent
    pub mock: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env if present (dev only)
    let _ = dotenvy::dotenv();

    // Structured JSON logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relay_api=debug,relay_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = config::AgentConfig::from_env();
    let app_state = state::AppState::new(transport::from_config(&config), config.use_mock);

    let app = routes::app(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::cors::build_cors_layer()),
        );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(mock = config.use_mock, region = %config.region, "Relay API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}
