//! Catalog domain types
//!
//! Closed enums for every categorical field (metric names, pitch classes, mode),
//! so invalid values are rejected where they enter the system rather than
//! compared as strings downstream.

use hitboard_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Musicality metric, one of seven 0–100 percentages per item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "danceability_%")]
    Danceability,
    #[serde(rename = "valence_%")]
    Valence,
    #[serde(rename = "energy_%")]
    Energy,
    #[serde(rename = "acousticness_%")]
    Acousticness,
    #[serde(rename = "instrumentalness_%")]
    Instrumentalness,
    #[serde(rename = "liveness_%")]
    Liveness,
    #[serde(rename = "speechiness_%")]
    Speechiness,
}

impl Metric {
    /// All seven metrics in declaration order
    pub const ALL: [Metric; 7] = [
        Metric::Danceability,
        Metric::Valence,
        Metric::Energy,
        Metric::Acousticness,
        Metric::Instrumentalness,
        Metric::Liveness,
        Metric::Speechiness,
    ];

    /// Metrics shown by the distribution views (dot plot, heatmap)
    ///
    /// Instrumentalness is near zero for almost every chart hit and is left out.
    pub const DISTRIBUTION: [Metric; 6] = [
        Metric::Danceability,
        Metric::Valence,
        Metric::Energy,
        Metric::Acousticness,
        Metric::Liveness,
        Metric::Speechiness,
    ];

    /// CSV column name, e.g. `danceability_%`
    pub fn column(self) -> &'static str {
        match self {
            Metric::Danceability => "danceability_%",
            Metric::Valence => "valence_%",
            Metric::Energy => "energy_%",
            Metric::Acousticness => "acousticness_%",
            Metric::Instrumentalness => "instrumentalness_%",
            Metric::Liveness => "liveness_%",
            Metric::Speechiness => "speechiness_%",
        }
    }

    /// Axis title, e.g. `Danceability %`
    pub fn title(self) -> &'static str {
        match self {
            Metric::Danceability => "Danceability %",
            Metric::Valence => "Valence %",
            Metric::Energy => "Energy %",
            Metric::Acousticness => "Acousticness %",
            Metric::Instrumentalness => "Instrumentalness %",
            Metric::Liveness => "Liveness %",
            Metric::Speechiness => "Speechiness %",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Metric {
    type Err = Error;

    /// Accepts the column name or the title, case-insensitively
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Metric::ALL
            .into_iter()
            .find(|m| {
                m.column().eq_ignore_ascii_case(wanted) || m.title().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| Error::InvalidInput(format!("Unknown metric: {}", s)))
    }
}

/// Pitch class of a track's key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitchClass {
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C#")]
    CSharp,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "D#")]
    DSharp,
    #[serde(rename = "E")]
    E,
    #[serde(rename = "F")]
    F,
    #[serde(rename = "F#")]
    FSharp,
    #[serde(rename = "G")]
    G,
    #[serde(rename = "G#")]
    GSharp,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A#")]
    ASharp,
    #[serde(rename = "B")]
    B,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::B => "B",
        }
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PitchClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        PitchClass::ALL
            .into_iter()
            .find(|p| p.label() == wanted)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown key: {}", s)))
    }
}

/// Binary mode of a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Mode {
    Major,
    Minor,
}

impl Mode {
    /// Anything other than exactly `Minor` counts as `Major`
    pub fn normalize(raw: &str) -> Mode {
        if raw == "Minor" {
            Mode::Minor
        } else {
            Mode::Major
        }
    }
}

/// The seven musicality percentages of one item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicalityProfile {
    #[serde(rename = "danceability_%")]
    pub danceability: u8,
    #[serde(rename = "valence_%")]
    pub valence: u8,
    #[serde(rename = "energy_%")]
    pub energy: u8,
    #[serde(rename = "acousticness_%")]
    pub acousticness: u8,
    #[serde(rename = "instrumentalness_%")]
    pub instrumentalness: u8,
    #[serde(rename = "liveness_%")]
    pub liveness: u8,
    #[serde(rename = "speechiness_%")]
    pub speechiness: u8,
}

impl MusicalityProfile {
    pub fn get(&self, metric: Metric) -> u8 {
        match metric {
            Metric::Danceability => self.danceability,
            Metric::Valence => self.valence,
            Metric::Energy => self.energy,
            Metric::Acousticness => self.acousticness,
            Metric::Instrumentalness => self.instrumentalness,
            Metric::Liveness => self.liveness,
            Metric::Speechiness => self.speechiness,
        }
    }
}

/// One cleaned catalog entry
///
/// Every field used downstream is present; items are never mutated after
/// cleaning, each stage builds a new table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub track_name: String,
    /// Artist credit, kept as one opaque string
    #[serde(rename = "artist(s)_name")]
    pub artists: String,
    pub streams: u64,
    #[serde(rename = "in_spotify_playlists")]
    pub spotify_playlists: u64,
    #[serde(rename = "in_apple_playlists")]
    pub apple_playlists: u64,
    #[serde(rename = "in_deezer_playlists")]
    pub deezer_playlists: u64,
    #[serde(flatten)]
    pub metrics: MusicalityProfile,
    pub key: PitchClass,
    /// Raw mode label as found in the source (normally `Major` or `Minor`)
    pub mode: String,
}

/// An item with its per-platform competition ranks
///
/// Ranks are computed once over the universe and never per slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedItem {
    #[serde(flatten)]
    pub item: Item,
    pub spotify_rank: u32,
    pub apple_rank: u32,
    pub deezer_rank: u32,
}
