use serde::Deserialize;
use std::path::Path;

use crate::error::Result;
use crate::models::StationMetadata;
use crate::registry::StationRegistry;

/// Row layout of a stations CSV: `Nombre,Lat,Lon,id,Municipio,url_reporte,slug,codigo`
#[derive(Debug, Deserialize)]
struct StationCsvRow {
    #[serde(rename = "Nombre")]
    name: String,
    #[serde(rename = "Lat")]
    latitude: f64,
    #[serde(rename = "Lon")]
    longitude: f64,
    id: u32,
    #[serde(rename = "Municipio")]
    municipality: String,
    url_reporte: String,
    slug: String,
    codigo: String,
}

impl From<StationCsvRow> for StationMetadata {
    fn from(row: StationCsvRow) -> Self {
        StationMetadata {
            slug: row.slug.trim().to_string(),
            name: row.name.trim().to_string(),
            id: row.id,
            code: row.codigo.trim().to_string(),
            latitude: row.latitude,
            longitude: row.longitude,
            municipality: row.municipality.trim().to_string(),
            report_url: row.url_reporte.trim().to_string(),
        }
    }
}

/// Loads a replacement station table from CSV
pub struct StationReader;

impl StationReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_stations(&self, path: &Path) -> Result<Vec<StationMetadata>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_path(path)?;

        let mut stations = Vec::new();
        for row in reader.deserialize::<StationCsvRow>() {
            stations.push(row?.into());
        }

        Ok(stations)
    }

    pub fn read_registry(&self, path: &Path) -> Result<StationRegistry> {
        StationRegistry::from_stations(self.read_stations(path)?)
    }
}

impl Default for StationReader {
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
    fn test_read_stations_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "Nombre,Lat,Lon,id,Municipio,url_reporte,slug,codigo")?;
        writeln!(
            temp_file,
            "CENTRO,25.6760139,-100.338553,4,Monterrey,https://aire.nl.gob.mx/r?estacion1=CENTRO,centro,CE"
        )?;
        writeln!(
            temp_file,
            "NORTE 2,25.7297587,-100.310019,12,San Nicolás,https://aire.nl.gob.mx/r?estacion1=NORTE2,norte2,N2"
        )?;

        let registry = StationReader::new().read_registry(temp_file.path())?;

        assert_eq!(registry.len(), 2);
        let norte2 = registry.require("norte2")?;
        assert_eq!(norte2.name, "NORTE 2");
        assert_eq!(norte2.municipality, "San Nicolás");
        assert_eq!(norte2.id, 12);

        Ok(())
    }

    #[test]
    fn test_invalid_latitude_rejected() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "Nombre,Lat,Lon,id,Municipio,url_reporte,slug,codigo")?;
        writeln!(
            temp_file,
            "CENTRO,125.6,-100.3,4,Monterrey,https://aire.nl.gob.mx/r,centro,CE"
        )?;

        assert!(StationReader::new().read_registry(temp_file.path()).is_err());

        Ok(())
    }
}
