use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use std::collections::BTreeMap;

use crate::models::wide::Completeness;

/// Formats accepted for upstream and archived timestamps, tried in order
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a timestamp into a timezone-naive value at whole-second
/// resolution, the resolution the archive is written with.
///
/// RFC 3339 inputs keep their local wall-clock time and drop the offset.
/// A bare date means midnight.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    parse_exact(text).and_then(|ts| ts.with_nanosecond(0))
}

fn parse_exact(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(text, format) {
            return Some(ts);
        }
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.naive_local());
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// One archived (station, timestamp) row
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub station: String,
    pub timestamp: NaiveDateTime,
    pub values: BTreeMap<String, Option<f64>>,
    pub status: Completeness,
}

impl HistoryRow {
    pub fn key(&self) -> (String, NaiveDateTime) {
        (self.station.clone(), self.timestamp)
    }

    pub fn value(&self, parameter: &str) -> Option<f64> {
        self.values.get(parameter).copied().flatten()
    }
}

/// The cumulative archive: unique by (station, timestamp) and sorted by it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryTable {
    pub parameters: Vec<String>,
    pub rows: Vec<HistoryRow>,
}

impl HistoryTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn find(&self, station: &str, timestamp: NaiveDateTime) -> Option<&HistoryRow> {
        self.rows
            .iter()
            .find(|r| r.station == station && r.timestamp == timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = ts(2024, 5, 1, 13, 0, 0);

        assert_eq!(parse_timestamp("2024-05-01 13:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T13:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01 13:00"), Some(expected));
        assert_eq!(parse_timestamp(" 2024-05-01 13:00:00.000 "), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01 13:00:00.500"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T13:00:00.999-06:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T13:00:00-06:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01"), Some(ts(2024, 5, 1, 0, 0, 0)));
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("ayer"), None);
        assert_eq!(parse_timestamp("2024-13-01 10:00:00"), None);
    }
}
