//! Ingestion and cleaning of the raw catalog table
//!
//! Two stages:
//! 1. [`read_raw_records`] decodes CSV bytes into [`RawRecord`]s. Bad encoding and
//!    broken CSV framing are fatal here; nothing is guessed or replaced.
//! 2. [`clean`] turns raw records into typed [`Item`]s. Every anomaly at this
//!    stage is a row exclusion, never an error, and the same input always
//!    excludes the same rows.

use crate::catalog::{Item, Metric, MusicalityProfile, PitchClass};
use hitboard_common::config::SourceEncoding;
use hitboard_common::{Error, Result};
use serde::Serialize;
use std::io::Read;
use tracing::{debug, info};

const TRACK_NAME: &str = "track_name";
const ARTISTS: &str = "artist(s)_name";
const STREAMS: &str = "streams";
const SPOTIFY_PLAYLISTS: &str = "in_spotify_playlists";
const APPLE_PLAYLISTS: &str = "in_apple_playlists";
const DEEZER_PLAYLISTS: &str = "in_deezer_playlists";
const KEY: &str = "key";
const MODE: &str = "mode";

/// One row of the source table, every cell still a string
///
/// `None` means the cell was absent or blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub track_name: Option<String>,
    pub artists: Option<String>,
    pub streams: Option<String>,
    pub spotify_playlists: Option<String>,
    pub apple_playlists: Option<String>,
    pub deezer_playlists: Option<String>,
    /// Indexed in `Metric::ALL` order
    pub metrics: [Option<String>; 7],
    pub key: Option<String>,
    pub mode: Option<String>,
}

/// Why a record was left out of the cleaned table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// A required cell was absent or blank
    MissingField(&'static str),
    /// Stream count is not made only of decimal digits
    NonNumericStreams,
    /// A playlist counter did not coerce to a non-negative integer
    InvalidCounter(&'static str),
    /// A musicality value is not an integer in 0..=100
    InvalidMetric(Metric),
    /// Key is not one of the twelve pitch-class labels
    UnknownKey,
}

/// Summary of one cleaning run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub dropped_missing: usize,
    pub dropped_non_numeric_streams: usize,
    pub dropped_invalid_value: usize,
}

impl CleanReport {
    fn record_drop(&mut self, reason: DropReason) {
        match reason {
            DropReason::MissingField(_) => self.dropped_missing += 1,
            DropReason::NonNumericStreams => self.dropped_non_numeric_streams += 1,
            DropReason::InvalidCounter(_) | DropReason::InvalidMetric(_) | DropReason::UnknownKey => {
                self.dropped_invalid_value += 1
            }
        }
    }

    pub fn rows_dropped(&self) -> usize {
        self.rows_read - self.rows_kept
    }
}

/// Cleaned items plus the report describing what was excluded
#[derive(Debug, Clone)]
pub struct CleanOutput {
    pub items: Vec<Item>,
    pub report: CleanReport,
}

// ========================================
// Reading
// ========================================

/// Column positions of the required fields in the header row
struct ColumnMap {
    track_name: usize,
    artists: usize,
    streams: usize,
    spotify_playlists: usize,
    apple_playlists: usize,
    deezer_playlists: usize,
    metrics: [usize; 7],
    key: usize,
    mode: usize,
}

impl ColumnMap {
    fn from_headers(headers: &[String]) -> Result<Self> {
        let find = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| Error::Malformed(format!("Missing required column: {}", name)))
        };

        let mut metrics = [0usize; 7];
        for (slot, metric) in metrics.iter_mut().zip(Metric::ALL) {
            *slot = find(metric.column())?;
        }

        Ok(Self {
            track_name: find(TRACK_NAME)?,
            artists: find(ARTISTS)?,
            streams: find(STREAMS)?,
            spotify_playlists: find(SPOTIFY_PLAYLISTS)?,
            apple_playlists: find(APPLE_PLAYLISTS)?,
            deezer_playlists: find(DEEZER_PLAYLISTS)?,
            metrics,
            key: find(KEY)?,
            mode: find(MODE)?,
        })
    }

    fn record(&self, fields: &[String]) -> RawRecord {
        let cell = |idx: usize| -> Option<String> {
            fields
                .get(idx)
                .filter(|v| !v.trim().is_empty())
                .cloned()
        };

        RawRecord {
            track_name: cell(self.track_name),
            artists: cell(self.artists),
            streams: cell(self.streams),
            spotify_playlists: cell(self.spotify_playlists),
            apple_playlists: cell(self.apple_playlists),
            deezer_playlists: cell(self.deezer_playlists),
            metrics: self.metrics.map(|idx| cell(idx)),
            key: cell(self.key),
            mode: cell(self.mode),
        }
    }
}

/// Read raw records from CSV with a header row
///
/// # Arguments
/// * `reader` - CSV bytes; the first row names the columns
/// * `encoding` - How to turn cell bytes into text
///
/// # Errors
/// * `Error::Encoding` - a cell is not valid in `encoding` (fatal, never replaced)
/// * `Error::Malformed` - a required column is missing or a row has the wrong width
/// * `Error::Io` - the reader failed
pub fn read_raw_records<R: Read>(reader: R, encoding: SourceEncoding) -> Result<Vec<RawRecord>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let header_bytes = rdr.byte_headers().map_err(map_csv_error)?.clone();
    let mut headers = decode_fields(&header_bytes, encoding, 0)?;
    if let Some(first) = headers.first_mut() {
        // Spreadsheet exports often lead with a byte-order mark
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_string();
        }
    }
    let columns = ColumnMap::from_headers(&headers)?;

    let mut records = Vec::new();
    for (index, result) in rdr.byte_records().enumerate() {
        let byte_record = result.map_err(map_csv_error)?;
        let record_no = index as u64 + 1;
        let fields = decode_fields(&byte_record, encoding, record_no)?;
        records.push(columns.record(&fields));
    }

    debug!("Read {} raw records ({:?})", records.len(), encoding);
    Ok(records)
}

fn decode_fields(
    record: &csv::ByteRecord,
    encoding: SourceEncoding,
    record_no: u64,
) -> Result<Vec<String>> {
    record
        .iter()
        .map(|bytes| decode_field(bytes, encoding, record_no))
        .collect()
}

fn decode_field(bytes: &[u8], encoding: SourceEncoding, record_no: u64) -> Result<String> {
    match encoding {
        SourceEncoding::Utf8 => std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|e| Error::Encoding {
                record: record_no,
                message: e.to_string(),
            }),
        SourceEncoding::Latin9 => Ok(bytes.iter().map(|&b| latin9_char(b)).collect()),
    }
}

/// ISO-8859-15 differs from ISO-8859-1 in eight positions
fn latin9_char(byte: u8) -> char {
    match byte {
        0xA4 => '\u{20AC}',
        0xA6 => '\u{0160}',
        0xA8 => '\u{0161}',
        0xB4 => '\u{017D}',
        0xB8 => '\u{017E}',
        0xBC => '\u{0152}',
        0xBD => '\u{0153}',
        0xBE => '\u{0178}',
        other => char::from(other),
    }
}

fn map_csv_error(err: csv::Error) -> Error {
    let record = err.position().map(|p| p.record()).unwrap_or(0);
    match err.into_kind() {
        csv::ErrorKind::Io(e) => Error::Io(e),
        csv::ErrorKind::Utf8 { err, .. } => Error::Encoding {
            record,
            message: err.to_string(),
        },
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => Error::Malformed(format!(
            "Record {} has {} fields, expected {}",
            record, len, expected_len
        )),
        other => Error::Malformed(format!("{:?}", other)),
    }
}

// ========================================
// Cleaning
// ========================================

/// Clean raw records into typed items
///
/// Rules, applied in order:
/// 1. A record missing any required value is excluded (no imputation).
/// 2. A record whose stream count is not entirely decimal digits is excluded.
/// 3. Playlist counters lose their grouping commas, then coerce to integers.
/// 4. Metrics must be integers in 0..=100 and the key a known pitch class.
///
/// Input order is preserved among the kept items.
pub fn clean<I>(records: I) -> CleanOutput
where
    I: IntoIterator<Item = RawRecord>,
{
    let mut report = CleanReport::default();
    let mut items = Vec::new();

    for (index, record) in records.into_iter().enumerate() {
        report.rows_read += 1;
        match clean_record(record) {
            Ok(item) => items.push(item),
            Err(reason) => {
                debug!("Excluding record {}: {:?}", index + 1, reason);
                report.record_drop(reason);
            }
        }
    }

    report.rows_kept = items.len();
    info!(
        "Cleaned catalog: {} of {} rows kept ({} missing values, {} non-numeric streams, {} invalid values)",
        report.rows_kept,
        report.rows_read,
        report.dropped_missing,
        report.dropped_non_numeric_streams,
        report.dropped_invalid_value
    );

    CleanOutput { items, report }
}

fn clean_record(record: RawRecord) -> std::result::Result<Item, DropReason> {
    let RawRecord {
        track_name,
        artists,
        streams,
        spotify_playlists,
        apple_playlists,
        deezer_playlists,
        metrics,
        key,
        mode,
    } = record;

    // Rule 1: every required value present
    let track_name = required(track_name, TRACK_NAME)?;
    let artists = required(artists, ARTISTS)?;
    let streams = required(streams, STREAMS)?;
    let spotify_playlists = required(spotify_playlists, SPOTIFY_PLAYLISTS)?;
    let apple_playlists = required(apple_playlists, APPLE_PLAYLISTS)?;
    let deezer_playlists = required(deezer_playlists, DEEZER_PLAYLISTS)?;
    let key = required(key, KEY)?;
    let mode = required(mode, MODE)?;
    let mut metric_values = [0u8; 7];
    let mut metric_texts = Vec::with_capacity(7);
    for (value, metric) in metrics.into_iter().zip(Metric::ALL) {
        metric_texts.push((required(value, metric.column())?, metric));
    }

    // Rule 2: stream count strictly digits
    let streams = parse_stream_count(&streams).ok_or(DropReason::NonNumericStreams)?;

    // Rule 3: counters
    let spotify_playlists = parse_counter(&spotify_playlists)
        .ok_or(DropReason::InvalidCounter(SPOTIFY_PLAYLISTS))?;
    let apple_playlists =
        parse_counter(&apple_playlists).ok_or(DropReason::InvalidCounter(APPLE_PLAYLISTS))?;
    let deezer_playlists =
        parse_counter(&deezer_playlists).ok_or(DropReason::InvalidCounter(DEEZER_PLAYLISTS))?;

    // Rule 4: metrics and key
    for (slot, (text, metric)) in metric_values.iter_mut().zip(metric_texts) {
        *slot = parse_percentage(&text).ok_or(DropReason::InvalidMetric(metric))?;
    }
    let key: PitchClass = key.parse().map_err(|_| DropReason::UnknownKey)?;

    let [danceability, valence, energy, acousticness, instrumentalness, liveness, speechiness] =
        metric_values;

    Ok(Item {
        track_name,
        artists,
        streams,
        spotify_playlists,
        apple_playlists,
        deezer_playlists,
        metrics: MusicalityProfile {
            danceability,
            valence,
            energy,
            acousticness,
            instrumentalness,
            liveness,
            speechiness,
        },
        key,
        mode,
    })
}

fn required(value: Option<String>, field: &'static str) -> std::result::Result<String, DropReason> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(DropReason::MissingField(field))
}

/// Stream counts must be made only of ASCII digits; no sign, space or separator
pub fn parse_stream_count(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Playlist counters may carry thousands separators (`"1,021"`)
pub fn parse_counter(raw: &str) -> Option<u64> {
    let digits: String = raw.trim().chars().filter(|&c| c != ',').collect();
    digits.parse().ok()
}

fn parse_percentage(raw: &str) -> Option<u8> {
    raw.trim().parse::<u8>().ok().filter(|v| *v <= 100)
}
