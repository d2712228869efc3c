//! hitboard-srv library - HTTP view adapter
//!
//! Owns one dashboard session, serves its derived datasets as JSON, accepts
//! control events and streams change events over SSE.

use axum::Router;
use hitboard_common::events::{EventBus, HitboardEvent};
use hitboard_core::Session;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod loader;
pub mod logging;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The single dashboard session; one control event at a time
    pub session: Arc<Mutex<Session>>,
    /// Fan-out of dashboard events to SSE clients
    pub events: EventBus,
}

impl AppState {
    /// Create application state and bridge selection writes onto the event bus
    ///
    /// Any writer of the selection store, HTTP or in-process, reaches SSE clients.
    pub fn new(mut session: Session, events: EventBus) -> Self {
        let bus = events.clone();
        session.selection_mut().subscribe(move |change| {
            bus.emit_lossy(HitboardEvent::SelectionChanged {
                track: change.current.clone(),
                previous: change.previous.clone(),
                timestamp: chrono::Utc::now(),
            });
        });

        Self {
            session: Arc::new(Mutex::new(session)),
            events,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let api = Router::new()
        .route("/api/view", get(api::get_view))
        .route("/api/slice", get(api::get_slice))
        .route("/api/metrics", get(api::get_metrics))
        .route("/api/window", post(api::set_window))
        .route("/api/axes", post(api::set_axes))
        .route("/api/selection", post(api::set_selection))
        .route("/api/events", get(api::event_stream));

    Router::new()
        .merge(api)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
