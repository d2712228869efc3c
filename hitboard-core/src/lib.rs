//! # Hitboard Core
//!
//! Ranking and reshaping pipeline behind the top-streams dashboard:
//!
//! raw CSV records → [`ingest::clean`] → [`universe::Universe`] (top-N by streams,
//! platform competition ranks) → [`slice::SliceController`] (user window) →
//! [`reshape`] projections → view adapters.
//!
//! [`selection::SelectionStore`] is the one piece of shared mutable state; it is
//! owned by the [`dashboard::Session`] and read by every view.
//!
//! Everything here is synchronous and deterministic. One control event is
//! processed to completion before the next.

pub mod aggregates;
pub mod catalog;
pub mod dashboard;
pub mod ingest;
pub mod rank;
pub mod reshape;
pub mod selection;
pub mod slice;
pub mod universe;

pub use catalog::{Item, Metric, Mode, MusicalityProfile, PitchClass, RankedItem};
pub use dashboard::{AxisChoice, ControlEvent, DashboardView, Session, SessionChange};
pub use hitboard_common::{Error, Result};
pub use selection::SelectionStore;
pub use slice::{Slice, SliceController};
pub use universe::Universe;
