use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

/// Build a CORS layer from the `RELAY_CORS_ORIGINS` env var.
///
/// - Origins: comma-separated list; unset, empty or `*` allows any origin
/// - Methods: GET, POST, OPTIONS
/// - Headers: Authorization, Content-Type
/// - Max age: 3600s
pub fn build_cors_layer() -> CorsLayer {
    let origins = std::env::var("RELAY_CORS_ORIGINS").unwrap_or_default();
    cors_layer_for(&origins)
}

fn parse_origins(origins: &str) -> Option<Vec<HeaderValue>> {
    let values: Vec<&str> = origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if values.is_empty() || values.contains(&"*") {
        return None;
    }
    Some(
        values
            .into_iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect(),
    )
}

fn cors_layer_for(origins: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            HeaderName::from_static("authorization"),
            HeaderName::from_static("content-type"),
        ])
        .max_age(std::time::Duration::from_secs(3600));

    match parse_origins(origins) {
        Some(list) => layer.allow_origin(list),
        None => layer.allow_origin(Any),
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use tower::ServiceExt;

    use super::*;

    async fn ok() -> StatusCode {
        StatusCode::OK
    }

    async fn allowed_origin(origins: &str, origin: &str) -> Option<String> {
        let app = Router::new()
            .route("/health", get(ok))
            .layer(cors_layer_for(origins));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("origin", origin)
                    .body(Body::empty())
                    .expect("request should build"),
            )
            .await
            .expect("request should succeed");
        response
            .headers()
            .get("access-control-allow-origin")
            .map(|v| v.to_str().expect("ascii header").to_string())
    }

    #[test]
    fn wildcard_and_blank_mean_any_origin() {
        assert_eq!(parse_origins(""), None);
        assert_eq!(parse_origins(" , "), None);
        assert_eq!(parse_origins("https://a.example, *"), None);
        assert_eq!(
            parse_origins("https://a.example, https://b.example").map(|v| v.len()),
            Some(2)
        );
    }

    #[tokio::test]
    async fn listed_origins_are_echoed_and_others_refused() {
        assert_eq!(
            allowed_origin("https://app.example", "https://app.example").await,
            Some("https://app.example".to_string())
        );
        assert_eq!(
            allowed_origin("https://app.example", "https://evil.example").await,
            None
        );
        assert_eq!(
            allowed_origin("", "https://anything.example").await,
            Some("*".to_string())
        );
    }
}
