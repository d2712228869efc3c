//! Wide → long projections and categorical cross-tabulations
//!
//! Stateless. Every function is a pure function of a ranked table (a slice or
//! the whole universe) and its arguments.

use crate::aggregates::{scale_dimension, MODE_SCALE_DIVISOR};
use crate::catalog::{Metric, Mode, PitchClass, RankedItem};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// One (item, metric) pair, metric-as-dimension
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongFormRow {
    pub track_name: String,
    #[serde(rename = "artist(s)_name")]
    pub artists: String,
    pub metric: Metric,
    pub value: u8,
    pub streams: u64,
    pub spotify_rank: u32,
}

/// Which identity field labels heatmap rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentityField {
    #[default]
    TrackName,
    Artists,
}

impl IdentityField {
    fn of(self, item: &RankedItem) -> &str {
        match self {
            IdentityField::TrackName => &item.item.track_name,
            IdentityField::Artists => &item.item.artists,
        }
    }
}

/// One heatmap cell
///
/// `label` is the row caption; `track_name` is always kept so cells join
/// back to the selection whichever identity field labels the rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub label: String,
    pub track_name: String,
    pub metric: Metric,
    pub value: u8,
    pub streams: u64,
}

/// Count of items sharing a (key, mode) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModeKeyCount {
    pub key: PitchClass,
    pub mode: Mode,
    pub count: usize,
}

/// Side-by-side Minor/Major key bars with a shared scale
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeSplit {
    /// Fixed key axis (from the universe, label descending)
    pub key_domain: Vec<PitchClass>,
    pub minor: Vec<ModeKeyCount>,
    pub major: Vec<ModeKeyCount>,
    /// Common count-axis maximum for both halves
    pub scale_ceiling: f64,
}

/// One row per (item, metric), item order × metric order
///
/// `rows.len() == items.len() * metrics.len()`; every row carries the stream
/// count of the item it came from.
pub fn to_long_form(items: &[RankedItem], metrics: &[Metric]) -> Vec<LongFormRow> {
    let mut rows = Vec::with_capacity(items.len() * metrics.len());
    for ranked in items {
        for &metric in metrics {
            rows.push(LongFormRow {
                track_name: ranked.item.track_name.clone(),
                artists: ranked.item.artists.clone(),
                metric,
                value: ranked.item.metrics.get(metric),
                streams: ranked.item.streams,
                spotify_rank: ranked.spotify_rank,
            });
        }
    }
    rows
}

/// Heatmap cells pre-sorted by stream count, highest first
///
/// Built metric by metric, then stably sorted, so rows with equal stream
/// counts stay in metric declaration order.
pub fn to_heatmap_matrix(
    items: &[RankedItem],
    metrics: &[Metric],
    label: IdentityField,
) -> Vec<HeatmapCell> {
    let mut cells = Vec::with_capacity(items.len() * metrics.len());
    for &metric in metrics {
        for ranked in items {
            cells.push(HeatmapCell {
                label: label.of(ranked).to_string(),
                track_name: ranked.item.track_name.clone(),
                metric,
                value: ranked.item.metrics.get(metric),
                streams: ranked.item.streams,
            });
        }
    }
    cells.sort_by(|a, b| b.streams.cmp(&a.streams));
    cells
}

/// Count items per (key, normalized mode)
///
/// Ordered by key label descending, then Major before Minor. Pairs with no
/// items are not listed.
pub fn cross_tab_mode_key(items: &[RankedItem]) -> Vec<ModeKeyCount> {
    let mut counts: HashMap<(PitchClass, Mode), usize> = HashMap::new();
    for ranked in items {
        let mode = Mode::normalize(&ranked.item.mode);
        *counts.entry((ranked.item.key, mode)).or_insert(0) += 1;
    }

    let mut rows: Vec<ModeKeyCount> = counts
        .into_iter()
        .map(|((key, mode), count)| ModeKeyCount { key, mode, count })
        .collect();
    rows.sort_by(|a, b| {
        b.key
            .label()
            .cmp(a.key.label())
            .then_with(|| a.mode.cmp(&b.mode))
    });
    rows
}

/// Distinct keys present, sorted by label descending
pub fn key_domain(items: &[RankedItem]) -> Vec<PitchClass> {
    let distinct: HashSet<PitchClass> = items.iter().map(|r| r.item.key).collect();
    let mut keys: Vec<PitchClass> = distinct.into_iter().collect();
    keys.sort_by(|a, b| b.label().cmp(a.label()));
    keys
}

/// Split the slice's cross-tab into Minor and Major halves
///
/// # Arguments
/// * `items` - the active slice
/// * `key_domain` - the universe key domain, shared by both halves
/// * `window` - current window size, drives the shared scale ceiling
pub fn mode_split(items: &[RankedItem], key_domain: &[PitchClass], window: usize) -> ModeSplit {
    let (minor, major): (Vec<_>, Vec<_>) = cross_tab_mode_key(items)
        .into_iter()
        .partition(|c| c.mode == Mode::Minor);

    ModeSplit {
        key_domain: key_domain.to_vec(),
        minor,
        major,
        scale_ceiling: scale_dimension(window, MODE_SCALE_DIVISOR),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Item, MusicalityProfile};

    fn ranked(name: &str, streams: u64, key: PitchClass, mode: &str) -> RankedItem {
        RankedItem {
            item: Item {
                track_name: name.to_string(),
                artists: format!("{} artist", name),
                streams,
                spotify_playlists: 0,
                apple_playlists: 0,
                deezer_playlists: 0,
                metrics: MusicalityProfile {
                    danceability: 10,
                    valence: 20,
                    energy: 30,
                    acousticness: 40,
                    instrumentalness: 50,
                    liveness: 60,
                    speechiness: 70,
                },
                key,
                mode: mode.to_string(),
            },
            spotify_rank: 1,
            apple_rank: 1,
            deezer_rank: 1,
        }
    }

    #[test]
    fn test_long_form_order_and_values() {
        let items = vec![
            ranked("a", 30, PitchClass::C, "Major"),
            ranked("b", 20, PitchClass::D, "Minor"),
        ];
        let rows = to_long_form(&items, &[Metric::Energy, Metric::Speechiness]);

        assert_eq!(rows.len(), 4);
        let order: Vec<_> = rows
            .iter()
            .map(|r| (r.track_name.as_str(), r.metric, r.value))
            .collect();
        assert_eq!(
            order,
            vec![
                ("a", Metric::Energy, 30),
                ("a", Metric::Speechiness, 70),
                ("b", Metric::Energy, 30),
                ("b", Metric::Speechiness, 70),
            ]
        );
    }

    #[test]
    fn test_long_form_empty_inputs() {
        let items = vec![ranked("a", 30, PitchClass::C, "Major")];
        assert!(to_long_form(&items, &[]).is_empty());
        assert!(to_long_form(&[], &Metric::ALL).is_empty());
    }

    #[test]
    fn test_heatmap_sorted_by_streams() {
        // Deliberately out of stream order
        let items = vec![
            ranked("low", 10, PitchClass::C, "Major"),
            ranked("high", 90, PitchClass::C, "Major"),
        ];
        let cells = to_heatmap_matrix(
            &items,
            &[Metric::Danceability, Metric::Valence],
            IdentityField::TrackName,
        );

        let labels: Vec<_> = cells.iter().map(|c| (c.label.as_str(), c.metric)).collect();
        assert_eq!(
            labels,
            vec![
                ("high", Metric::Danceability),
                ("high", Metric::Valence),
                ("low", Metric::Danceability),
                ("low", Metric::Valence),
            ]
        );
    }

    #[test]
    fn test_heatmap_artist_labels() {
        let items = vec![ranked("a", 10, PitchClass::C, "Major")];
        let cells = to_heatmap_matrix(&items, &[Metric::Energy], IdentityField::Artists);
        assert_eq!(cells[0].label, "a artist");
        assert_eq!(cells[0].track_name, "a");
    }

    #[test]
    fn test_cross_tab_normalizes_stray_modes() {
        let items = vec![
            ranked("a", 1, PitchClass::G, "Major"),
            ranked("b", 1, PitchClass::G, "Lydian"),
            ranked("c", 1, PitchClass::G, "Minor"),
            ranked("d", 1, PitchClass::A, "Minor"),
        ];
        let rows = cross_tab_mode_key(&items);
        assert_eq!(
            rows,
            vec![
                ModeKeyCount { key: PitchClass::G, mode: Mode::Major, count: 2 },
                ModeKeyCount { key: PitchClass::G, mode: Mode::Minor, count: 1 },
                ModeKeyCount { key: PitchClass::A, mode: Mode::Minor, count: 1 },
            ]
        );
    }

    #[test]
    fn test_key_domain_sorted_descending() {
        let items = vec![
            ranked("a", 1, PitchClass::A, "Major"),
            ranked("b", 1, PitchClass::GSharp, "Major"),
            ranked("c", 1, PitchClass::CSharp, "Major"),
            ranked("d", 1, PitchClass::A, "Minor"),
            ranked("e", 1, PitchClass::G, "Minor"),
        ];
        assert_eq!(
            key_domain(&items),
            vec![PitchClass::GSharp, PitchClass::G, PitchClass::CSharp, PitchClass::A]
        );
    }

    #[test]
    fn test_mode_split_partitions_and_scales() {
        let items = vec![
            ranked("a", 1, PitchClass::G, "Major"),
            ranked("b", 1, PitchClass::E, "Minor"),
        ];
        let domain = vec![PitchClass::G, PitchClass::E, PitchClass::B];
        let split = mode_split(&items, &domain, 12);

        assert_eq!(split.key_domain, domain);
        assert_eq!(split.major.len(), 1);
        assert_eq!(split.minor.len(), 1);
        assert_eq!(split.minor[0].key, PitchClass::E);
        assert!((split.scale_ceiling - 2.0).abs() < f64::EPSILON);
    }
}
