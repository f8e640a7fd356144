use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::Result;
use crate::models::{HistoryTable, SnapshotRow, WideTable};
use crate::utils::constants::{
    ARCHIVE_TIMESTAMP_FORMAT, COL_DATE, COL_STATION, COL_STATUS, SNAPSHOT_COLUMNS, UTF8_BOM,
};

/// Writes the snapshot, wide and archive CSV files
pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    /// Snapshot rows, replacing any previous snapshot. Upstream fields
    /// without a fixed column follow the fixed columns, sorted by name.
    pub fn write_snapshot(&self, rows: &[SnapshotRow], path: &Path) -> Result<()> {
        ensure_parent(path)?;

        let extra_columns: Vec<&str> = rows
            .iter()
            .flat_map(|row| row.extra.keys().map(String::as_str))
            .filter(|key| !SNAPSHOT_COLUMNS.contains(key))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(SNAPSHOT_COLUMNS.iter().chain(extra_columns.iter()))?;

        for row in rows {
            let mut cells = row.cells();
            cells.extend(
                extra_columns
                    .iter()
                    .map(|key| row.extra.get(*key).cloned().unwrap_or_default()),
            );
            writer.write_record(&cells)?;
        }
        writer.flush()?;

        debug!("Wrote {} snapshot rows to {}", rows.len(), path.display());
        Ok(())
    }

    /// The current run's wide table, `[Estacion, Date, <parameters>, estatus]`
    pub fn write_wide(&self, table: &WideTable, path: &Path) -> Result<()> {
        ensure_parent(path)?;
        let file = BufWriter::new(File::create(path)?);

        let rows = table.rows.iter().map(|row| {
            let mut cells = Vec::with_capacity(row.values.len() + 3);
            cells.push(row.station.clone());
            cells.push(row.timestamp.clone());
            cells.extend(row.values.iter().map(|v| format_value(*v)));
            cells.push(row.status.to_string());
            cells
        });

        write_table(file, &table.parameters, rows)?;
        debug!("Wrote {} wide rows to {}", table.len(), path.display());
        Ok(())
    }

    /// Rewrite the whole archive through a temporary file renamed into
    /// place, so readers never observe a half-written archive.
    pub fn write_history(&self, table: &HistoryTable, path: &Path) -> Result<()> {
        let dir = ensure_parent(path)?;
        let mut temp = NamedTempFile::new_in(dir)?;

        let rows = table.rows.iter().map(|row| {
            let mut cells = Vec::with_capacity(table.parameters.len() + 3);
            cells.push(row.station.clone());
            cells.push(row.timestamp.format(ARCHIVE_TIMESTAMP_FORMAT).to_string());
            cells.extend(table.parameters.iter().map(|p| format_value(row.value(p))));
            cells.push(row.status.to_string());
            cells
        });

        write_table(BufWriter::new(temp.as_file_mut()), &table.parameters, rows)?;
        temp.persist(path).map_err(|e| e.error)?;

        debug!("Wrote {} archive rows to {}", table.len(), path.display());
        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn write_table<W, I>(mut out: W, parameters: &[String], rows: I) -> Result<()>
where
    W: Write,
    I: Iterator<Item = Vec<String>>,
{
    out.write_all(UTF8_BOM)?;

    let mut writer = csv::Writer::from_writer(out);
    let mut header = vec![COL_STATION.to_string(), COL_DATE.to_string()];
    header.extend(parameters.iter().cloned());
    header.push(COL_STATUS.to_string());
    writer.write_record(&header)?;

    for row in rows {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

fn format_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Create the parent directory of `path` and return it (`.` for bare names)
fn ensure_parent(path: &Path) -> Result<&Path> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;
    Ok(parent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Completeness, WideRow};
    use tempfile::TempDir;

    #[test]
    fn test_write_wide_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("ancho.csv");

        let table = WideTable {
            parameters: vec!["O3".to_string(), "PM10".to_string()],
            rows: vec![WideRow {
                station: "centro".to_string(),
                timestamp: "2024-05-01 13:00:00".to_string(),
                values: vec![None, Some(58.5)],
                status: Completeness::Incomplete,
            }],
        };

        CsvWriter::new().write_wide(&table, &path).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(
            text,
            "Estacion,Date,O3,PM10,estatus\ncentro,2024-05-01 13:00:00,,58.5,incompleto\n"
        );
    }

    #[test]
    fn test_write_snapshot_header_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshot.csv");

        CsvWriter::new()
            .write_snapshot(
                &[SnapshotRow {
                    station: "centro".to_string(),
                    parameter: Some("PM10".to_string()),
                    pollutant: None,
                    index_value: Some(120.0),
                    concentration: None,
                    date: Some("2024-05-01 13:00:00".to_string()),
                    quality: "Mala".to_string(),
                    risk: "Alto".to_string(),
                    latitude: None,
                    longitude: None,
                    municipality: None,
                    report_url: None,
                    extra: [
                        ("Units".to_string(), "ug/m3".to_string()),
                        ("Calidad".to_string(), "ignorada".to_string()),
                    ]
                    .into_iter()
                    .collect(),
                }],
                &path,
            )
            .unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            "Estacion,Parameter,contaminante,HrAveData,concentracion,Date,Calidad,Riesgo,Lat,Lon,Municipio,url_reporte,Units"
        );
        assert_eq!(
            text.lines().nth(1).unwrap(),
            "centro,PM10,,120,,2024-05-01 13:00:00,Mala,Alto,,,,,ug/m3"
        );
    }
}
