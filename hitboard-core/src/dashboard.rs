//! Dashboard session: control events in, derived views out
//!
//! Every view is a pure function of (universe, window, axes). A window or axis
//! event recomputes all of them at once so no view is ever derived from a
//! stale slice. Selection events only touch the selection store; views read
//! it when they render.

use crate::aggregates::{major_share, stream_share, Donut, DonutColor};
use crate::catalog::{Metric, RankedItem};
use crate::reshape::{
    mode_split, to_heatmap_matrix, to_long_form, HeatmapCell, IdentityField, LongFormRow,
    ModeSplit,
};
use crate::selection::{Emphasis, SelectionChange, SelectionStore, ViewKind};
use crate::slice::{Slice, SliceController};
use crate::universe::Universe;
use hitboard_common::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Metrics plotted on the correlation scatter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AxisChoice {
    pub x: Metric,
    pub y: Metric,
}

impl Default for AxisChoice {
    fn default() -> Self {
        Self {
            x: Metric::Danceability,
            y: Metric::Energy,
        }
    }
}

impl AxisChoice {
    /// Parse both axes from metric column names or titles
    pub fn parse(x: &str, y: &str) -> Result<Self> {
        Ok(Self {
            x: x.parse()?,
            y: y.parse()?,
        })
    }
}

// ========================================
// View projections
// ========================================

/// One bar of the streams leaderboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopularityRow {
    /// 1-based position in the slice
    pub position: usize,
    pub track_name: String,
    #[serde(rename = "artist(s)_name")]
    pub artists: String,
    pub streams: u64,
    pub spotify_rank: u32,
    pub apple_rank: u32,
    pub deezer_rank: u32,
}

/// Streams leaderboard for the active window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopularityBar {
    pub title: String,
    /// Bar scale maximum, 0 for an empty slice
    pub max_streams: u64,
    pub rows: Vec<PopularityRow>,
}

/// Platform-rank scatter point (x = Spotify, y = Apple, size = Deezer)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformPoint {
    pub track_name: String,
    #[serde(rename = "artist(s)_name")]
    pub artists: String,
    pub spotify_rank: u32,
    pub apple_rank: u32,
    pub deezer_rank: u32,
    pub streams: u64,
}

/// Musicality correlation point for the chosen axes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationPoint {
    pub track_name: String,
    #[serde(rename = "artist(s)_name")]
    pub artists: String,
    pub x: u8,
    pub y: u8,
    pub streams: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationView {
    pub x: Metric,
    pub y: Metric,
    pub x_title: &'static str,
    pub y_title: &'static str,
    pub points: Vec<CorrelationPoint>,
}

/// Every derived dataset the views render
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub window: usize,
    pub slice_len: usize,
    pub axes: AxisChoice,
    pub popularity: PopularityBar,
    pub platform_ranks: Vec<PlatformPoint>,
    pub correlation: CorrelationView,
    /// Metric distribution dot plot (long form)
    pub metric_dots: Vec<LongFormRow>,
    pub heatmap: Vec<HeatmapCell>,
    pub stream_share: Donut,
    pub mode_share: Donut,
    pub mode_split: ModeSplit,
}

/// Derive every view for window `n` and `axes`
///
/// Pure: the same inputs always give the same view. `n` is clamped to the
/// universe size.
pub fn derive_view(universe: &Universe, n: usize, axes: AxisChoice) -> DashboardView {
    let window = n.min(universe.len());
    let slice = Slice::from_universe(universe, window);
    project(universe, &slice, window, axes)
}

fn project(universe: &Universe, slice: &Slice, window: usize, axes: AxisChoice) -> DashboardView {
    let items = slice.items();

    DashboardView {
        window,
        slice_len: slice.len(),
        axes,
        popularity: popularity_bar(slice, window),
        platform_ranks: items.iter().map(platform_point).collect(),
        correlation: correlation_view(items, axes),
        metric_dots: to_long_form(items, &Metric::DISTRIBUTION),
        heatmap: to_heatmap_matrix(items, &Metric::DISTRIBUTION, IdentityField::TrackName),
        stream_share: Donut::new(
            stream_share(slice, universe),
            format!("Top {} Song Stream Percentage", window),
            "Other Songs",
            DonutColor::Red,
        ),
        mode_share: Donut::new(
            major_share(items),
            "Major Percentage",
            "Minor Percentage",
            DonutColor::Orange,
        ),
        mode_split: mode_split(items, universe.key_domain(), window),
    }
}

fn popularity_bar(slice: &Slice, window: usize) -> PopularityBar {
    let rows = slice
        .entries()
        .map(|entry| PopularityRow {
            position: entry.position,
            track_name: entry.item.item.track_name.clone(),
            artists: entry.item.item.artists.clone(),
            streams: entry.item.item.streams,
            spotify_rank: entry.item.spotify_rank,
            apple_rank: entry.item.apple_rank,
            deezer_rank: entry.item.deezer_rank,
        })
        .collect();

    PopularityBar {
        title: format!("Top {} Songs Streaming on Spotify", window),
        max_streams: slice.max_streams(),
        rows,
    }
}

fn platform_point(ranked: &RankedItem) -> PlatformPoint {
    PlatformPoint {
        track_name: ranked.item.track_name.clone(),
        artists: ranked.item.artists.clone(),
        spotify_rank: ranked.spotify_rank,
        apple_rank: ranked.apple_rank,
        deezer_rank: ranked.deezer_rank,
        streams: ranked.item.streams,
    }
}

fn correlation_view(items: &[RankedItem], axes: AxisChoice) -> CorrelationView {
    let points = items
        .iter()
        .map(|ranked| CorrelationPoint {
            track_name: ranked.item.track_name.clone(),
            artists: ranked.item.artists.clone(),
            x: ranked.item.metrics.get(axes.x),
            y: ranked.item.metrics.get(axes.y),
            streams: ranked.item.streams,
        })
        .collect();

    CorrelationView {
        x: axes.x,
        y: axes.y,
        x_title: axes.x.title(),
        y_title: axes.y.title(),
        points,
    }
}

// ========================================
// Session
// ========================================

/// Per-track mark styling under the current selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkStyle {
    pub track_name: String,
    pub emphasis: Emphasis,
    /// Mark colour in each selection-aware view
    pub colors: HashMap<ViewKind, &'static str>,
}

/// A discrete user input
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    SetWindow(usize),
    SetAxes(AxisChoice),
    Select(Option<String>),
}

/// What an applied event changed
#[derive(Debug, Clone, PartialEq)]
pub enum SessionChange {
    Window { window: usize, slice_len: usize },
    Axes(AxisChoice),
    Selection(SelectionChange),
}

/// One dashboard session: window, axes, selection and the current views
#[derive(Debug)]
pub struct Session {
    controller: SliceController,
    axes: AxisChoice,
    selection: SelectionStore,
    view: DashboardView,
}

impl Session {
    /// Create a session over `universe`
    ///
    /// The selection store is injected so callers (and tests) decide which
    /// instance every view shares.
    pub fn new(
        universe: Arc<Universe>,
        window: usize,
        axes: AxisChoice,
        selection: SelectionStore,
    ) -> Self {
        let controller = SliceController::new(universe, window);
        let view = project(
            controller.universe(),
            controller.active_slice(),
            controller.window(),
            axes,
        );
        info!(
            "Session started: window {} of {}, axes {} x {}",
            controller.window(),
            controller.universe().len(),
            axes.x,
            axes.y
        );

        Self {
            controller,
            axes,
            selection,
            view,
        }
    }

    /// Process one event to completion
    pub fn apply(&mut self, event: ControlEvent) -> SessionChange {
        debug!("Applying {:?}", event);
        match event {
            ControlEvent::SetWindow(n) => {
                let (window, slice_len) = self.set_window(n);
                SessionChange::Window { window, slice_len }
            }
            ControlEvent::SetAxes(axes) => SessionChange::Axes(self.set_axes(axes)),
            ControlEvent::Select(track) => SessionChange::Selection(self.select(track)),
        }
    }

    /// Clamp and apply a new window, re-deriving every view
    ///
    /// Returns the clamped window and the new slice length.
    pub fn set_window(&mut self, n: usize) -> (usize, usize) {
        let window = self.controller.set_window(n);
        self.rederive();
        (window, self.controller.active_slice().len())
    }

    pub fn set_axes(&mut self, axes: AxisChoice) -> AxisChoice {
        self.axes = axes;
        self.rederive();
        axes
    }

    /// Write the selection store; views are not re-derived
    pub fn select(&mut self, track: Option<String>) -> SelectionChange {
        self.selection.highlight(track)
    }

    fn rederive(&mut self) {
        self.view = project(
            self.controller.universe(),
            self.controller.active_slice(),
            self.controller.window(),
            self.axes,
        );
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn window(&self) -> usize {
        self.controller.window()
    }

    pub fn axes(&self) -> AxisChoice {
        self.axes
    }

    pub fn active_slice(&self) -> &Slice {
        self.controller.active_slice()
    }

    pub fn universe(&self) -> &Universe {
        self.controller.universe()
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    /// Mutable access for registering subscribers
    pub fn selection_mut(&mut self) -> &mut SelectionStore {
        &mut self.selection
    }

    pub fn emphasis(&self, track_name: &str) -> Emphasis {
        self.selection.emphasis(track_name)
    }

    /// Styling of every slice track as the selection-aware views should draw it
    pub fn mark_styles(&self) -> Vec<MarkStyle> {
        self.active_slice()
            .items()
            .iter()
            .map(|ranked| {
                let emphasis = self.emphasis(&ranked.item.track_name);
                MarkStyle {
                    track_name: ranked.item.track_name.clone(),
                    emphasis,
                    colors: ViewKind::ALL
                        .into_iter()
                        .map(|view| (view, view.mark_color(emphasis)))
                        .collect(),
                }
            })
            .collect()
    }
}
