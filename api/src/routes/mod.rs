pub mod agent;
pub mod dispatch;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// All API routes bound to `state`, without outer middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(agent::router())
        .merge(dispatch::router())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::transport::MockTransport;

    #[tokio::test]
    async fn health_reports_mock_mode() {
        let response = app(AppState::new(Arc::new(MockTransport), true))
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request should build"),
            )
            .await
            .expect("request should succeed");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should read");
        let body: Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body["status"], "ok");
        assert_eq!(body["mock"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
