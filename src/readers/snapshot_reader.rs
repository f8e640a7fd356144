use std::path::Path;

use crate::error::Result;

/// A snapshot CSV loaded as text cells, keeping whatever columns it has
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SnapshotTable {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn cell(&self, row: usize, name: &str) -> Option<&str> {
        let column = self.column(name)?;
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub struct SnapshotReader;

impl SnapshotReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read(&self, path: &Path) -> Result<SnapshotTable> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        Ok(SnapshotTable { headers, rows })
    }
}

impl Default for SnapshotReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_snapshot() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        temp_file.write_all(b"\xEF\xBB\xBFEstacion,Calidad,Date\n")?;
        writeln!(temp_file, "centro,Mala,2024-05-01 13:00:00")?;
        writeln!(temp_file, "sur,Buena")?;

        let table = SnapshotReader::new().read(temp_file.path())?;

        assert_eq!(table.headers, vec!["Estacion", "Calidad", "Date"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, "Calidad"), Some("Mala"));
        assert_eq!(table.cell(1, "Date"), Some(""));
        assert_eq!(table.column("Riesgo"), None);

        Ok(())
    }
}
