//! Control event endpoints
//!
//! Each request is one control event, applied to completion under the
//! session lock before the response is built.

use axum::{extract::State, Json};
use hitboard_common::events::HitboardEvent;
use hitboard_core::AxisChoice;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct WindowRequest {
    /// Signed so that negative values clamp to 0 instead of failing to parse
    pub n: i64,
}

impl WindowRequest {
    /// Requested window with negatives clamped to 0
    pub fn window(&self) -> usize {
        usize::try_from(self.n.max(0)).unwrap_or(usize::MAX)
    }
}

#[derive(Debug, Deserialize)]
pub struct AxesRequest {
    pub x: String,
    pub y: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    /// Track to highlight; null clears the highlight
    pub track: Option<String>,
}

/// POST /api/window
///
/// Out-of-range values are clamped to `[0, universe size]`. The event is
/// emitted under the session lock so SSE clients see windows in apply order.
pub async fn set_window(
    State(state): State<AppState>,
    Json(req): Json<WindowRequest>,
) -> Json<Value> {
    let mut session = state.session.lock().await;
    let (window, slice_len) = session.set_window(req.window());
    info!("Window set to {} ({} items)", window, slice_len);

    state.events.emit_lossy(HitboardEvent::WindowChanged {
        window,
        slice_len,
        timestamp: chrono::Utc::now(),
    });
    drop(session);

    Json(json!({ "window": window, "slice_len": slice_len }))
}

/// POST /api/axes
///
/// Unknown metric names are rejected with 400 and leave the axes unchanged.
pub async fn set_axes(
    State(state): State<AppState>,
    Json(req): Json<AxesRequest>,
) -> Result<Json<Value>, ApiError> {
    let axes = AxisChoice::parse(&req.x, &req.y)?;

    let mut session = state.session.lock().await;
    session.set_axes(axes);
    info!("Axes set to {} x {}", axes.x, axes.y);

    state.events.emit_lossy(HitboardEvent::AxesChanged {
        x: axes.x.column().to_string(),
        y: axes.y.column().to_string(),
        timestamp: chrono::Utc::now(),
    });
    drop(session);

    Ok(Json(json!({ "x": axes.x, "y": axes.y })))
}

/// POST /api/selection
///
/// The `SelectionChanged` event comes from the store subscription, not from here.
pub async fn set_selection(
    State(state): State<AppState>,
    Json(req): Json<SelectionRequest>,
) -> Json<Value> {
    let change = state.session.lock().await.select(req.track);
    Json(json!({ "track": change.current, "previous": change.previous }))
}
