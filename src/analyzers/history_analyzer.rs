use chrono::NaiveDateTime;
use std::collections::BTreeMap;

use crate::error::{ProcessingError, Result};
use crate::models::{Completeness, HistoryTable};
use crate::utils::constants::ARCHIVE_TIMESTAMP_FORMAT;

#[derive(Debug)]
pub struct ArchiveStatistics {
    pub total_rows: usize,
    pub complete_rows: usize,
    pub time_span: (NaiveDateTime, NaiveDateTime),
    pub rows_per_station: BTreeMap<String, usize>,
    /// Non-missing cells per parameter column
    pub coverage: BTreeMap<String, usize>,
}

impl ArchiveStatistics {
    pub fn station_count(&self) -> usize {
        self.rows_per_station.len()
    }

    pub fn complete_percentage(&self) -> f64 {
        (self.complete_rows as f64 / self.total_rows as f64) * 100.0
    }

    pub fn summary(&self) -> String {
        format!(
            "Stations: {} stations\n\
            Time Span: {} to {} ({} days)\n\
            Rows: {} total\n\
            Parameters: {}\n\
            Completeness: {}/{} rows complete ({:.1}%)",
            self.station_count(),
            self.time_span.0.format(ARCHIVE_TIMESTAMP_FORMAT),
            self.time_span.1.format(ARCHIVE_TIMESTAMP_FORMAT),
            self.time_span
                .1
                .signed_duration_since(self.time_span.0)
                .num_days(),
            self.total_rows,
            self.coverage.keys().cloned().collect::<Vec<_>>().join(", "),
            self.complete_rows,
            self.total_rows,
            self.complete_percentage()
        )
    }

    pub fn detailed_summary(&self) -> String {
        let mut out = self.summary();

        out.push_str("\n\nRows per station:");
        for (station, rows) in &self.rows_per_station {
            out.push_str(&format!("\n- {}: {}", station, rows));
        }

        out.push_str("\n\nParameter coverage:");
        for (parameter, present) in &self.coverage {
            out.push_str(&format!(
                "\n- {}: {}/{} ({:.1}%)",
                parameter,
                present,
                self.total_rows,
                (*present as f64 / self.total_rows as f64) * 100.0
            ));
        }

        out
    }
}

/// Summarises the historical archive for the `info` command
pub struct HistoryAnalyzer;

impl HistoryAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, table: &HistoryTable) -> Result<ArchiveStatistics> {
        let (first, rest) = table
            .rows
            .split_first()
            .ok_or_else(|| ProcessingError::InvalidFormat("Archive has no rows".to_string()))?;

        let mut start = first.timestamp;
        let mut end = first.timestamp;
        let mut rows_per_station = BTreeMap::new();
        let mut coverage: BTreeMap<String, usize> =
            table.parameters.iter().map(|p| (p.clone(), 0)).collect();
        let mut complete_rows = 0;

        for row in std::iter::once(first).chain(rest) {
            start = start.min(row.timestamp);
            end = end.max(row.timestamp);
            *rows_per_station.entry(row.station.clone()).or_insert(0) += 1;

            if row.status == Completeness::Complete {
                complete_rows += 1;
            }
            for (parameter, present) in coverage.iter_mut() {
                if row.value(parameter).is_some() {
                    *present += 1;
                }
            }
        }

        Ok(ArchiveStatistics {
            total_rows: table.len(),
            complete_rows,
            time_span: (start, end),
            rows_per_station,
            coverage,
        })
    }
}

impl Default for HistoryAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_timestamp, HistoryRow};

    fn row(station: &str, ts: &str, pm10: Option<f64>, status: Completeness) -> HistoryRow {
        HistoryRow {
            station: station.to_string(),
            timestamp: parse_timestamp(ts).unwrap(),
            values: [("PM10".to_string(), pm10)].into_iter().collect(),
            status,
        }
    }

    #[test]
    fn test_analyze_archive() {
        let table = HistoryTable {
            parameters: vec!["PM10".to_string()],
            rows: vec![
                row("centro", "2024-05-01 12:00:00", Some(40.0), Completeness::Complete),
                row("centro", "2024-05-03 12:00:00", None, Completeness::Incomplete),
                row("sur", "2024-05-02 08:00:00", Some(20.0), Completeness::Complete),
            ],
        };

        let stats = HistoryAnalyzer::new().analyze(&table).unwrap();

        assert_eq!(stats.total_rows, 3);
        assert_eq!(stats.station_count(), 2);
        assert_eq!(stats.rows_per_station["centro"], 2);
        assert_eq!(stats.coverage["PM10"], 2);
        assert_eq!(stats.complete_rows, 2);
        assert_eq!(
            stats.time_span,
            (
                parse_timestamp("2024-05-01 12:00:00").unwrap(),
                parse_timestamp("2024-05-03 12:00:00").unwrap()
            )
        );
        assert!(stats.summary().contains("(2 days)"));
        assert!(stats.detailed_summary().contains("- sur: 1"));
    }

    #[test]
    fn test_empty_archive_is_an_error() {
        assert!(HistoryAnalyzer::new()
            .analyze(&HistoryTable::default())
            .is_err());
    }
}
