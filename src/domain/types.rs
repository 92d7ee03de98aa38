//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - decoded straight from API payloads
//! - handed to the chart queue by value
//! - exported to JSON

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::calendar::{SLOT_COUNT, parse_api_date};

/// One observation as returned by the API (`{"fecha": ..., "valor": ...}`).
///
/// A missing or null `valor` means "no data", never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "valor", default)]
    pub value: Option<f64>,
}

impl RawSample {
    pub fn new(date: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            date: date.into(),
            value,
        }
    }

    /// Calendar date of the sample, if the timestamp is well formed.
    pub fn day(&self) -> Option<NaiveDate> {
        parse_api_date(&self.date)
    }
}

/// One year of an indicator laid out on the 366-slot axis.
///
/// The point array length is fixed at construction; only values can change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub year: i32,
    /// Index into the chart palette.
    pub color_index: usize,
    points: Vec<Option<f64>>,
}

impl Dataset {
    /// An all-empty dataset.
    pub fn empty(label: impl Into<String>, year: i32, color_index: usize) -> Self {
        Self {
            label: label.into(),
            year,
            color_index,
            points: vec![None; SLOT_COUNT],
        }
    }

    /// Build from explicit points; the slice is padded or truncated to the axis length.
    pub fn from_points(label: impl Into<String>, year: i32, color_index: usize, points: &[Option<f64>]) -> Self {
        let mut ds = Self::empty(label, year, color_index);
        for (dst, src) in ds.points.iter_mut().zip(points) {
            *dst = *src;
        }
        ds
    }

    pub fn points(&self) -> &[Option<f64>] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [Option<f64>] {
        &mut self.points
    }

    /// Number of slots holding a value.
    pub fn filled(&self) -> usize {
        self.points.iter().filter(|p| p.is_some()).count()
    }
}

/// Day-over-day movement attached to the "last value" card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Change {
    pub delta: f64,
    pub percent: f64,
}

impl Change {
    pub fn is_positive(&self) -> bool {
        self.delta > 0.0
    }
}

/// A display-ready statistics card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stat {
    pub title: String,
    pub value: String,
    pub subtext: String,
    pub change: Option<Change>,
}

/// Everything the shell needs to redraw a finished load: the composed cache payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub indicator: String,
    pub year_count: u32,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub statistics: Vec<Stat>,
    pub last_update: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_decode_from_api_field_names() {
        let json = r#"[{"fecha":"2024-01-02T03:00:00.000Z","valor":884.59},{"fecha":"2024-01-01T03:00:00.000Z"}]"#;
        let samples: Vec<RawSample> = serde_json::from_str(json).unwrap();
        assert_eq!(samples[0].value, Some(884.59));
        assert_eq!(samples[1].value, None);
        assert_eq!(samples[0].day(), NaiveDate::from_ymd_opt(2024, 1, 2));
    }

    #[test]
    fn datasets_keep_the_axis_length() {
        let ds = Dataset::from_points("x", 2024, 0, &[Some(1.0), None, Some(3.0)]);
        assert_eq!(ds.points().len(), SLOT_COUNT);
        assert_eq!(ds.filled(), 2);

        let long = vec![Some(0.0); SLOT_COUNT + 10];
        let ds = Dataset::from_points("y", 2024, 1, &long);
        assert_eq!(ds.points().len(), SLOT_COUNT);
    }
}
