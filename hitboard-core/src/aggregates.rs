//! Scalar aggregates shown next to the views: shares, donut rings, axis ceilings
//!
//! Degenerate inputs (empty slice, zero totals) give defined zero results.

use crate::catalog::RankedItem;
use crate::slice::Slice;
use crate::universe::Universe;
use hitboard_common::{Error, Result};
use serde::Serialize;
use std::str::FromStr;

/// Divisor for the mode-split count axis
///
/// Sized so the axis fits the largest plausible per-key count.
pub const MODE_SCALE_DIVISOR: f64 = 6.0;

/// Share of `total` that `subset` represents, as a whole percentage
///
/// Rounded half to even, clamped to 100. Returns 0 when either input is 0.
///
/// # Examples
/// ```
/// use hitboard_core::aggregates::percentage_of_total;
///
/// assert_eq!(percentage_of_total(1, 3), 33);
/// assert_eq!(percentage_of_total(5, 0), 0);
/// assert_eq!(percentage_of_total(7, 7), 100);
/// ```
pub fn percentage_of_total(subset: u128, total: u128) -> u8 {
    if subset == 0 || total == 0 {
        return 0;
    }
    let pct = (subset as f64 / total as f64 * 100.0).round_ties_even();
    pct.clamp(0.0, 100.0) as u8
}

/// Shared axis ceiling for split categorical charts: `range / divisor`
///
/// A non-positive divisor yields 0.
pub fn scale_dimension(range: usize, divisor: f64) -> f64 {
    if divisor <= 0.0 {
        return 0.0;
    }
    range as f64 / divisor
}

/// Share of universe streams held by the slice
pub fn stream_share(slice: &Slice, universe: &Universe) -> u8 {
    percentage_of_total(slice.total_streams(), universe.total_streams())
}

/// Share of items whose mode is exactly `Major`; 0 for an empty table
pub fn major_share(items: &[RankedItem]) -> u8 {
    let major = items.iter().filter(|r| r.item.mode == "Major").count();
    percentage_of_total(major as u128, items.len() as u128)
}

// ========================================
// Donut rings
// ========================================

/// Donut colour scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DonutColor {
    Blue,
    Green,
    Orange,
    Red,
}

/// Primary (value) and secondary (remainder) colour of a donut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DonutPalette {
    pub primary: &'static str,
    pub secondary: &'static str,
}

const DONUT_PALETTES: [(DonutColor, DonutPalette); 4] = [
    (
        DonutColor::Blue,
        DonutPalette { primary: "#29b5e8", secondary: "#155F7A" },
    ),
    (
        DonutColor::Green,
        DonutPalette { primary: "#27AE60", secondary: "#12783D" },
    ),
    (
        DonutColor::Orange,
        DonutPalette { primary: "#F39C12", secondary: "#875A12" },
    ),
    (
        DonutColor::Red,
        DonutPalette { primary: "#E74C3C", secondary: "#781F16" },
    ),
];

impl DonutColor {
    pub fn palette(self) -> DonutPalette {
        DONUT_PALETTES
            .iter()
            .find(|(color, _)| *color == self)
            .map(|(_, palette)| *palette)
            .unwrap_or(DONUT_PALETTES[0].1)
    }
}

impl FromStr for DonutColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blue" => Ok(DonutColor::Blue),
            "green" => Ok(DonutColor::Green),
            "orange" => Ok(DonutColor::Orange),
            "red" => Ok(DonutColor::Red),
            other => Err(Error::InvalidInput(format!("Unknown donut colour: {}", other))),
        }
    }
}

/// One labelled arc of a donut
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DonutSegment {
    pub topic: String,
    pub percent: u8,
}

/// A two-arc percentage ring
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Donut {
    /// Centre text value, 0–100
    pub value: u8,
    pub label: String,
    pub other_label: String,
    /// Remainder arc first, then the value arc
    pub segments: [DonutSegment; 2],
    /// Full-circle track drawn behind the arcs
    pub background: [DonutSegment; 2],
    pub palette: DonutPalette,
}

impl Donut {
    pub fn new(value: u8, label: impl Into<String>, other_label: impl Into<String>, color: DonutColor) -> Self {
        let value = value.min(100);
        let label = label.into();
        let other_label = other_label.into();
        let segment = |topic: &str, percent: u8| DonutSegment {
            topic: topic.to_string(),
            percent,
        };

        Self {
            value,
            segments: [segment(&other_label, 100 - value), segment(&label, value)],
            background: [segment(&other_label, 100), segment(&label, 0)],
            palette: color.palette(),
            label,
            other_label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_boundaries() {
        assert_eq!(percentage_of_total(0, 0), 0);
        assert_eq!(percentage_of_total(10, 0), 0);
        assert_eq!(percentage_of_total(0, 10), 0);
        assert_eq!(percentage_of_total(10, 10), 100);
        assert_eq!(percentage_of_total(20, 10), 100);
    }

    #[test]
    fn test_percentage_rounds_half_to_even() {
        // 1/8 = 12.5% -> 12, 3/8 = 37.5% -> 38
        assert_eq!(percentage_of_total(1, 8), 12);
        assert_eq!(percentage_of_total(3, 8), 38);
        assert_eq!(percentage_of_total(2, 3), 67);
    }

    #[test]
    fn test_percentage_of_totals_beyond_u64() {
        let max = u128::from(u64::MAX);
        assert_eq!(percentage_of_total(max, max * 2), 50);
        assert_eq!(percentage_of_total(max * 2, max * 2), 100);
    }

    #[test]
    fn test_scale_dimension() {
        assert!((scale_dimension(12, MODE_SCALE_DIVISOR) - 2.0).abs() < f64::EPSILON);
        assert!((scale_dimension(10, MODE_SCALE_DIVISOR) - 10.0 / 6.0).abs() < f64::EPSILON);
        assert_eq!(scale_dimension(0, MODE_SCALE_DIVISOR), 0.0);
        assert_eq!(scale_dimension(10, 0.0), 0.0);
    }

    #[test]
    fn test_major_share_empty_is_zero() {
        assert_eq!(major_share(&[]), 0);
    }

    #[test]
    fn test_donut_palette_lookup() {
        assert_eq!(DonutColor::Red.palette().primary, "#E74C3C");
        assert_eq!(DonutColor::Orange.palette().secondary, "#875A12");
        assert_eq!("Green".parse::<DonutColor>().unwrap(), DonutColor::Green);
        assert!("purple".parse::<DonutColor>().is_err());
    }

    #[test]
    fn test_donut_segments() {
        let donut = Donut::new(30, "Top 10", "Other Songs", DonutColor::Red);
        assert_eq!(donut.segments[0].topic, "Other Songs");
        assert_eq!(donut.segments[0].percent, 70);
        assert_eq!(donut.segments[1].topic, "Top 10");
        assert_eq!(donut.segments[1].percent, 30);
        assert_eq!(donut.background[0].percent, 100);
        assert_eq!(donut.background[1].percent, 0);
    }
}
