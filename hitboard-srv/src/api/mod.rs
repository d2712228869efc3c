//! HTTP API handlers for hitboard-srv

pub mod controls;
pub mod error;
pub mod health;
pub mod sse;
pub mod views;

pub use controls::{set_axes, set_selection, set_window};
pub use error::ApiError;
pub use health::health_routes;
pub use sse::event_stream;
pub use views::{get_metrics, get_slice, get_view};
