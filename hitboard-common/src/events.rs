//! Event types for the hitboard event system
//!
//! The dashboard core notifies its in-process subscribers synchronously. The
//! EventBus here is the fan-out used by network adapters (SSE clients), fed by
//! a synchronous listener registered on the core.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Dashboard events
///
/// Events are broadcast via EventBus and serialized for SSE transmission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HitboardEvent {
    /// Highlighted track changed
    ///
    /// Triggers:
    /// - SSE: every view re-renders its emphasis
    SelectionChanged {
        /// Newly highlighted track (None = no highlight)
        track: Option<String>,
        /// Previously highlighted track
        previous: Option<String>,
        /// When selection changed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Top-N window changed and every derived view was recomputed
    WindowChanged {
        /// Window size after clamping
        window: usize,
        /// Number of items in the new slice
        slice_len: usize,
        /// When window changed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Correlation axes changed
    AxesChanged {
        /// X-axis metric column name
        x: String,
        /// Y-axis metric column name
        y: String,
        /// When axes changed
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl HitboardEvent {
    /// Event type string used as the SSE `event:` field
    pub fn event_type(&self) -> &'static str {
        match self {
            HitboardEvent::SelectionChanged { .. } => "SelectionChanged",
            HitboardEvent::WindowChanged { .. } => "WindowChanged",
            HitboardEvent::AxesChanged { .. } => "AxesChanged",
        }
    }
}

// ========================================
// EventBus Implementation
// ========================================

/// Central event distribution bus
///
/// The EventBus uses tokio::broadcast internally, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
///
/// # Examples
///
/// ```
/// use hitboard_common::events::{EventBus, HitboardEvent};
///
/// let event_bus = EventBus::new(100);
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit(HitboardEvent::WindowChanged {
///     window: 10,
///     slice_len: 10,
///     timestamp: chrono::Utc::now(),
/// }).ok();
///
/// assert!(matches!(rx.try_recv(), Ok(HitboardEvent::WindowChanged { window: 10, .. })));
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<HitboardEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of events to buffer before dropping old events
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<HitboardEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: HitboardEvent,
    ) -> Result<usize, broadcast::error::SendError<HitboardEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: HitboardEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
