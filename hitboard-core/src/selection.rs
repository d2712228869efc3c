//! Shared highlight selection
//!
//! One store per session, handed to every view at construction. Any view may
//! write it; every write notifies all subscribers synchronously, in
//! subscription order, before `highlight` returns. Last write wins.

use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Handle returned by [`SelectionStore::subscribe`]
pub type SubscriptionId = u64;

/// Snapshot passed to subscribers on every write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionChange {
    pub current: Option<String>,
    pub previous: Option<String>,
}

impl SelectionChange {
    pub fn is_highlighted(&self, track_name: &str) -> bool {
        self.current.as_deref() == Some(track_name)
    }
}

type Listener = Box<dyn FnMut(&SelectionChange) + Send>;

/// Holds at most one highlighted track; initially none
#[derive(Default)]
pub struct SelectionStore {
    current: Option<String>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: SubscriptionId,
}

impl fmt::Debug for SelectionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionStore")
            .field("current", &self.current)
            .field("subscribers", &self.listeners.len())
            .finish()
    }
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or clear, with `None`) the highlighted track and notify everyone
    ///
    /// Subscribers are notified on every write, including one that repeats
    /// the current value.
    pub fn highlight(&mut self, track_name: Option<String>) -> SelectionChange {
        let previous = std::mem::replace(&mut self.current, track_name);
        let change = SelectionChange {
            current: self.current.clone(),
            previous,
        };
        debug!(
            "Selection {:?} -> {:?} ({} subscribers)",
            change.previous,
            change.current,
            self.listeners.len()
        );
        for (_, listener) in self.listeners.iter_mut() {
            listener(&change);
        }
        change
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_highlighted(&self, track_name: &str) -> bool {
        self.current.as_deref() == Some(track_name)
    }

    /// Emphasis a view should give `track_name` right now
    pub fn emphasis(&self, track_name: &str) -> Emphasis {
        match self.current.as_deref() {
            None => Emphasis::Neutral,
            Some(current) if current == track_name => Emphasis::Highlighted,
            Some(_) => Emphasis::Dimmed,
        }
    }

    /// Register a listener called on every write
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&SelectionChange) + Send + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns false if the id was unknown
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

// ========================================
// View emphasis
// ========================================

/// How a view renders one item relative to the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Emphasis {
    /// Nothing selected; every item in the view's active colour
    Neutral,
    Highlighted,
    Dimmed,
}

/// Views that react to the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ViewKind {
    PopularityBar,
    PlatformScatter,
    MetricDots,
    MetricCorrelation,
}

/// Colour used for dimmed marks in every view
pub const DIMMED_COLOR: &str = "lightgray";

const ACTIVE_COLORS: [(ViewKind, &str); 4] = [
    (ViewKind::PopularityBar, "steelblue"),
    (ViewKind::PlatformScatter, "steelblue"),
    (ViewKind::MetricDots, "darkgreen"),
    (ViewKind::MetricCorrelation, "darkgreen"),
];

impl ViewKind {
    pub const ALL: [ViewKind; 4] = [
        ViewKind::PopularityBar,
        ViewKind::PlatformScatter,
        ViewKind::MetricDots,
        ViewKind::MetricCorrelation,
    ];

    /// Colour for marks that are neutral or highlighted
    pub fn active_color(self) -> &'static str {
        ACTIVE_COLORS
            .iter()
            .find(|(kind, _)| *kind == self)
            .map(|(_, color)| *color)
            .unwrap_or(DIMMED_COLOR)
    }

    pub fn mark_color(self, emphasis: Emphasis) -> &'static str {
        match emphasis {
            Emphasis::Neutral | Emphasis::Highlighted => self.active_color(),
            Emphasis::Dimmed => DIMMED_COLOR,
        }
    }
}
