use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::reading::parse_numeric;
use crate::models::{parse_timestamp, Completeness, HistoryRow, HistoryTable};
use crate::utils::constants::{COL_DATE, COL_STATION, COL_STATUS};

/// Reads the historical archive CSV
pub struct HistoryReader;

impl HistoryReader {
    pub fn new() -> Self {
        Self
    }

    /// Read the archive, or an empty table when the file does not exist
    pub fn read_or_empty(&self, path: &Path) -> Result<HistoryTable> {
        if !path.exists() {
            debug!("No archive at {}, starting empty", path.display());
            return Ok(HistoryTable::default());
        }
        self.read(path)
    }

    pub fn read(&self, path: &Path) -> Result<HistoryTable> {
        if std::fs::metadata(path)?.len() == 0 {
            return Ok(HistoryTable::default());
        }

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| ProcessingError::MissingColumn(name.to_string()))
        };
        let station_col = position(COL_STATION)?;
        let date_col = position(COL_DATE)?;
        let status_col = headers.iter().position(|h| h == COL_STATUS);

        let parameter_cols: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != station_col && *i != date_col && Some(*i) != status_col)
            .map(|(i, h)| (i, h.clone()))
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let station = record.get(station_col).unwrap_or_default().to_string();
            let raw_date = record.get(date_col).unwrap_or_default();

            let timestamp =
                parse_timestamp(raw_date).ok_or_else(|| ProcessingError::InvalidTimestamp {
                    station: station.clone(),
                    value: raw_date.to_string(),
                })?;

            let values: BTreeMap<String, Option<f64>> = parameter_cols
                .iter()
                .map(|(i, name)| (name.clone(), record.get(*i).and_then(parse_numeric)))
                .collect();

            let status = status_col
                .and_then(|i| record.get(i))
                .and_then(|s| s.parse::<Completeness>().ok())
                .unwrap_or_else(|| {
                    let cells: Vec<Option<f64>> = values.values().copied().collect();
                    Completeness::from_values(&cells)
                });

            rows.push(HistoryRow {
                station,
                timestamp,
                values,
                status,
            });
        }

        if rows.is_empty() {
            return Ok(HistoryTable::default());
        }

        let mut parameters: Vec<String> = parameter_cols.into_iter().map(|(_, name)| name).collect();
        parameters.sort();

        Ok(HistoryTable { parameters, rows })
    }
}

impl Default for HistoryReader {
    fn default() -> Self {
        Self::new()
    }
}
