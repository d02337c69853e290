//! Dashboard — Axum web server exposing legs and ranked combos.
//!
//! Serves a small REST API (JSON + CSV download) for an external UI.
//! CORS enabled for local development.

pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use routes::AppState;

/// Bind `port` on all interfaces and serve until the future is dropped.
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind dashboard port {port}"))?;
    info!(port, "Dashboard server listening on http://localhost:{port}");

    axum::serve(listener, app)
        .await
        .context("Dashboard server error")
}

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/legs", get(routes::get_legs))
        .route("/api/legs/refresh", post(routes::refresh_legs))
        .route("/api/combos", get(routes::get_combos).post(routes::post_combos))
        .route("/api/combos.csv", get(routes::get_combos_csv))
        .route("/health", get(routes::health))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::config::AppConfig;
    use crate::data::slate::StaticLegSource;
    use routes::DashboardState;

    fn test_state() -> AppState {
        Arc::new(DashboardState::new(AppConfig::default(), StaticLegSource::sample_slate()))
    }

    async fn get_request(uri: &str) -> axum::response::Response {
        build_router(test_state())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        assert_eq!(get_request("/health").await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_legs_endpoint() {
        let resp = get_request("/api/legs").await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
        let json: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.len(), 5);
        assert_eq!(json[0]["event"], "Match 1");
    }

    #[tokio::test]
    async fn test_combos_endpoint() {
        let resp = get_request("/api/combos?sizes=3&stake=5&top_n=50").await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 1_000_000).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["total_combos"], 10);
        let combos = json["combos"].as_array().unwrap();
        assert_eq!(combos.len(), 10);
        assert!(combos.iter().all(|c| c["size"] == 3));
        let first = combos[0]["probability"].as_f64().unwrap();
        let last = combos[9]["probability"].as_f64().unwrap();
        assert!(first >= last);
    }

    #[tokio::test]
    async fn test_combos_bad_size_is_400() {
        let resp = get_request("/api/combos?sizes=three").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("three"));
    }

    #[tokio::test]
    async fn test_combos_negative_stake_is_400() {
        let resp = get_request("/api/combos?stake=-5").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_combos_csv_endpoint() {
        let resp = get_request("/api/combos.csv?top_n=5").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers()[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/csv"));

        let body = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
        let csv = String::from_utf8(body.to_vec()).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], crate::export::CSV_HEADER);
        assert_eq!(lines.len(), 6);
    }

    #[tokio::test]
    async fn test_post_combos_endpoint() {
        let payload = serde_json::json!({
            "legs": [
                {"event": "Match 1", "market": "Home", "odds": 1.55, "confidence": 0.6},
                {"event": "Match 2", "market": "Home", "odds": 1.85},
                {"event": "Match 3", "market": "Home", "odds": 1.72, "confidence": 0.7}
            ],
            "sizes": [3],
            "stake": 5.0
        });
        let resp = build_router(test_state())
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/combos")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["combos"][0]["combined_odds"], 4.932);
        assert_eq!(json["combos"][0]["potential_payout"], 24.66);
    }

    #[tokio::test]
    async fn test_post_combos_over_max_legs_is_400() {
        let max_legs = AppConfig::default().combos.max_legs;
        let legs: Vec<serde_json::Value> = (0..=max_legs)
            .map(|i| serde_json::json!({"event": format!("Match {i}"), "market": "Home", "odds": 2.0}))
            .collect();
        let payload = serde_json::json!({ "legs": legs, "sizes": [3, 4] });

        let resp = build_router(test_state())
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/combos")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("too many legs"));
    }

    #[tokio::test]
    async fn test_combos_odds_range_query() {
        let resp = get_request("/api/combos?max_odds=1.9&top_n=50").await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 1_000_000).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["legs_considered"], 3);
        assert_eq!(json["total_combos"], 1);
    }
}
