//! Read-only view endpoints
//!
//! Handlers hold the session lock only long to clone what they serialize.

use axum::{extract::State, Json};
use hitboard_core::dashboard::{DashboardView, MarkStyle};
use hitboard_core::slice::SliceEntry;
use hitboard_core::Metric;
use serde::Serialize;
use serde_json::{json, Value};

use crate::AppState;

/// Full dashboard state as the client renders it
#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub view: DashboardView,
    /// Highlighted track, if any
    pub selection: Option<String>,
    /// Per-track emphasis and mark colours under the current selection
    pub marks: Vec<MarkStyle>,
}

/// GET /api/view
pub async fn get_view(State(state): State<AppState>) -> Json<ViewResponse> {
    let session = state.session.lock().await;
    Json(ViewResponse {
        view: session.view().clone(),
        selection: session.selection().current().map(str::to_string),
        marks: session.mark_styles(),
    })
}

/// GET /api/slice
///
/// Active slice rows with their 1-based positions.
pub async fn get_slice(State(state): State<AppState>) -> Json<Value> {
    let session = state.session.lock().await;
    let rows: Vec<SliceEntry<'_>> = session.active_slice().entries().collect();
    Json(json!({
        "window": session.window(),
        "universe_size": session.universe().len(),
        "rows": rows,
    }))
}

/// One axis selector option
#[derive(Debug, Serialize)]
pub struct MetricOption {
    pub column: &'static str,
    pub title: &'static str,
}

/// GET /api/metrics
pub async fn get_metrics() -> Json<Vec<MetricOption>> {
    Json(
        Metric::ALL
            .iter()
            .map(|metric| MetricOption {
                column: metric.column(),
                title: metric.title(),
            })
            .collect(),
    )
}
