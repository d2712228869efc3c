//! The fixed ranking universe
//!
//! Built once at startup from the cleaned catalog: the top `size` items by
//! stream count, ranked per platform among themselves. Every later share and
//! rank is relative to this set, never to a slice of it.

use crate::catalog::{Item, PitchClass, RankedItem};
use crate::rank::{rank, sort_by_streams, truncate_universe};
use crate::reshape::key_domain;
use tracing::info;

/// Default universe size (top 100 by streams)
pub const DEFAULT_UNIVERSE_SIZE: usize = 100;

#[derive(Debug, Clone)]
pub struct Universe {
    items: Vec<RankedItem>,
    total_streams: u128,
    key_domain: Vec<PitchClass>,
}

impl Universe {
    /// Sort by streams (stable), truncate to `size`, then rank within the result
    ///
    /// A population smaller than `size` is used whole.
    pub fn build(items: Vec<Item>, size: usize) -> Self {
        let population = items.len();
        let top = truncate_universe(sort_by_streams(items), size);
        let items = rank(top);
        let total_streams = items.iter().map(|r| u128::from(r.item.streams)).sum();
        let key_domain = key_domain(&items);

        info!(
            "Universe built: {} of {} items, {} total streams, {} distinct keys",
            items.len(),
            population,
            total_streams,
            key_domain.len()
        );

        Self {
            items,
            total_streams,
            key_domain,
        }
    }

    /// Ranked items, highest stream count first
    pub fn items(&self) -> &[RankedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of streams over the universe; denominator for every share
    ///
    /// Widened to `u128` so a hundred `u64` counts cannot overflow.
    pub fn total_streams(&self) -> u128 {
        self.total_streams
    }

    /// Distinct keys present in the universe, sorted by label descending
    ///
    /// Fixed for the session so categorical axes keep their width and order
    /// whatever the window size.
    pub fn key_domain(&self) -> &[PitchClass] {
        &self.key_domain
    }
}
