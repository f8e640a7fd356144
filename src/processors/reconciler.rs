use chrono::NaiveDateTime;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{ProcessingError, Result};
use crate::models::{parse_timestamp, HistoryRow, HistoryTable, WideTable};
use crate::readers::HistoryReader;
use crate::writers::CsvWriter;

/// Outcome of folding one run into the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveUpdate {
    pub existing_rows: usize,
    pub incoming_rows: usize,
    pub replaced_rows: usize,
    pub total_rows: usize,
}

impl ArchiveUpdate {
    pub fn added_rows(&self) -> usize {
        self.total_rows.saturating_sub(self.existing_rows)
    }
}

/// Merges new wide rows into the historical archive.
///
/// Existing rows come first and incoming rows after them, so for a shared
/// (station, timestamp) key the latest row in that order is kept. The
/// archive is assumed to have a single writer at a time.
pub struct HistoryReconciler;

impl HistoryReconciler {
    pub fn new() -> Self {
        Self
    }

    /// Convert wide rows to archive rows; any unparseable timestamp fails
    /// the whole conversion.
    pub fn to_history_rows(&self, table: &WideTable) -> Result<Vec<HistoryRow>> {
        table
            .rows
            .iter()
            .map(|row| {
                let timestamp = parse_timestamp(&row.timestamp).ok_or_else(|| {
                    ProcessingError::InvalidTimestamp {
                        station: row.station.clone(),
                        value: row.timestamp.clone(),
                    }
                })?;

                let values = table
                    .parameters
                    .iter()
                    .cloned()
                    .zip(row.values.iter().copied())
                    .collect();

                Ok(HistoryRow {
                    station: row.station.clone(),
                    timestamp,
                    values,
                    status: row.status,
                })
            })
            .collect()
    }

    pub fn reconcile(&self, existing: HistoryTable, incoming: &WideTable) -> Result<HistoryTable> {
        let (table, _) = self.reconcile_with_stats(existing, incoming)?;
        Ok(table)
    }

    fn reconcile_with_stats(
        &self,
        existing: HistoryTable,
        incoming: &WideTable,
    ) -> Result<(HistoryTable, ArchiveUpdate)> {
        let incoming_rows = self.to_history_rows(incoming)?;
        let existing_count = existing.rows.len();
        let incoming_count = incoming_rows.len();

        let parameters: Vec<String> = existing
            .parameters
            .iter()
            .chain(incoming.parameters.iter())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut merged: BTreeMap<(String, NaiveDateTime), HistoryRow> = BTreeMap::new();
        let mut replaced_rows = 0;

        for row in existing.rows.into_iter().chain(incoming_rows) {
            if let Some(previous) = merged.insert(row.key(), row) {
                debug!(
                    "Replaced archived row for {} at {}",
                    previous.station, previous.timestamp
                );
                replaced_rows += 1;
            }
        }

        let rows: Vec<HistoryRow> = merged.into_values().collect();
        let update = ArchiveUpdate {
            existing_rows: existing_count,
            incoming_rows: incoming_count,
            replaced_rows,
            total_rows: rows.len(),
        };

        Ok((HistoryTable { parameters, rows }, update))
    }

    /// Load the archive at `path` (empty if absent), merge `incoming` and
    /// rewrite the whole file.
    pub fn update_archive(&self, path: &Path, incoming: &WideTable) -> Result<ArchiveUpdate> {
        let existing = HistoryReader::new().read_or_empty(path)?;
        let (table, update) = self.reconcile_with_stats(existing, incoming)?;

        CsvWriter::new().write_history(&table, path)?;

        info!(
            "Archive {} updated: {} rows ({} added, {} replaced)",
            path.display(),
            update.total_rows,
            update.added_rows(),
            update.replaced_rows
        );

        Ok(update)
    }
}

impl Default for HistoryReconciler {
    fn default() -> Self {
        Self::new()
    }
}
