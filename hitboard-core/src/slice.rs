//! Top-N slice of the universe and its controller
//!
//! The controller is the only place the window size changes. Every change
//! re-derives the slice synchronously; nothing derived from an older window
//! survives the call.

use crate::catalog::RankedItem;
use crate::universe::Universe;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Ordered top-N items with contiguous 1-based positions
///
/// Position is positional (index + 1), not a competition rank: equal stream
/// counts still get distinct positions, in their universe order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slice {
    items: Vec<RankedItem>,
}

/// One slice row with its position
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SliceEntry<'a> {
    pub position: usize,
    #[serde(flatten)]
    pub item: &'a RankedItem,
}

impl Slice {
    /// Take the first `n` universe items and re-sort them by streams (stable)
    pub fn from_universe(universe: &Universe, n: usize) -> Self {
        let n = n.min(universe.len());
        let mut items = universe.items()[..n].to_vec();
        items.sort_by(|a, b| b.item.streams.cmp(&a.item.streams));
        Self { items }
    }

    pub fn items(&self) -> &[RankedItem] {
        &self.items
    }

    /// Rows with their 1-based positions
    pub fn entries(&self) -> impl Iterator<Item = SliceEntry<'_>> {
        self.items
            .iter()
            .enumerate()
            .map(|(idx, item)| SliceEntry {
                position: idx + 1,
                item,
            })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_streams(&self) -> u128 {
        self.items.iter().map(|r| u128::from(r.item.streams)).sum()
    }

    /// Largest stream count in the slice, 0 when empty
    pub fn max_streams(&self) -> u64 {
        self.items.iter().map(|r| r.item.streams).max().unwrap_or(0)
    }

    pub fn contains_track(&self, track_name: &str) -> bool {
        self.items.iter().any(|r| r.item.track_name == track_name)
    }
}

/// Holds the user-controlled window and the slice derived from it
#[derive(Debug, Clone)]
pub struct SliceController {
    universe: Arc<Universe>,
    window: usize,
    slice: Slice,
}

impl SliceController {
    /// Start with window `n` (clamped)
    pub fn new(universe: Arc<Universe>, n: usize) -> Self {
        let mut controller = Self {
            universe,
            window: 0,
            slice: Slice::default(),
        };
        controller.set_window(n);
        controller
    }

    /// Change the window and re-derive the slice
    ///
    /// Out-of-range values are clamped to `[0, universe size]`. Returns the
    /// window actually applied.
    pub fn set_window(&mut self, n: usize) -> usize {
        let clamped = n.min(self.universe.len());
        if clamped != n {
            debug!("Window {} clamped to {}", n, clamped);
        }
        self.window = clamped;
        self.slice = Slice::from_universe(&self.universe, clamped);
        clamped
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn active_slice(&self) -> &Slice {
        &self.slice
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }
}
