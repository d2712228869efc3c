//! Health check endpoint
//!
//! Also reports the loaded universe and live session state, so a probe can
//! tell an empty catalog from a healthy one.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    /// Items in the ranking universe; 0 means the catalog cleaned to nothing
    pub universe_size: usize,
    pub window: usize,
    /// Connected SSE clients
    pub event_subscribers: usize,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let session = state.session.lock().await;
    let universe_size = session.universe().len();

    Json(HealthResponse {
        status: if universe_size == 0 { "empty" } else { "ok" },
        module: "hitboard-srv",
        version: env!("CARGO_PKG_VERSION"),
        universe_size,
        window: session.window(),
        event_subscribers: state.events.subscriber_count(),
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
