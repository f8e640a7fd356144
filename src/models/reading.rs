use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::models::quality::Classification;
use crate::models::station::StationMetadata;

/// One record of the bulk page's embedded array.
///
/// Fields the pipeline reads are declared; every other key of the object
/// is kept in `extra` and carried into the snapshot. Index and
/// concentration values arrive as numbers, numeric strings or nulls
/// depending on the station.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BulkRecord {
    #[serde(rename = "Estacion", default)]
    pub station: String,

    #[serde(rename = "Parameter", default, deserialize_with = "lenient_text")]
    pub parameter: Option<String>,

    #[serde(rename = "contaminante", default, deserialize_with = "lenient_text")]
    pub pollutant: Option<String>,

    #[serde(rename = "HrAveData", default, deserialize_with = "lenient_number")]
    pub index_value: Option<f64>,

    #[serde(rename = "concentracion", default, deserialize_with = "lenient_text")]
    pub concentration: Option<String>,

    #[serde(rename = "Date", default, deserialize_with = "lenient_text")]
    pub date: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One record of a station's index API response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IndexRecord {
    #[serde(rename = "Parameter", default, deserialize_with = "lenient_text")]
    pub parameter: Option<String>,

    #[serde(rename = "Date", default, deserialize_with = "lenient_text")]
    pub date: Option<String>,

    #[serde(rename = "HrAveData", default, deserialize_with = "lenient_number")]
    pub index_value: Option<f64>,
}

/// Long-format reading: one value per (station, parameter, timestamp)
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub station: String,
    pub parameter: String,
    pub timestamp: String,
    pub value: Option<f64>,
}

impl Reading {
    pub fn new(station: &str, parameter: &str, timestamp: &str, value: Option<f64>) -> Self {
        Self {
            station: station.to_string(),
            parameter: parameter.to_string(),
            timestamp: timestamp.to_string(),
            value,
        }
    }

    /// Build a reading from an index API record; records without a
    /// parameter or date cannot be placed in the wide table.
    pub fn from_index_record(station: &str, record: IndexRecord) -> Option<Self> {
        Some(Self {
            station: station.to_string(),
            parameter: record.parameter?,
            timestamp: record.date?,
            value: record.index_value,
        })
    }
}

/// A classified and enriched snapshot row
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRow {
    pub station: String,
    pub parameter: Option<String>,
    pub pollutant: Option<String>,
    pub index_value: Option<f64>,
    pub concentration: Option<String>,
    pub date: Option<String>,
    pub quality: String,
    pub risk: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub municipality: Option<String>,
    pub report_url: Option<String>,
    /// Upstream fields without a dedicated column, as cell text
    pub extra: BTreeMap<String, String>,
}

impl SnapshotRow {
    pub fn new(
        record: BulkRecord,
        classification: Classification,
        station: Option<&StationMetadata>,
    ) -> Self {
        let extra = record
            .extra
            .into_iter()
            .map(|(key, value)| (key, value_text(value)))
            .collect();

        Self {
            station: record.station,
            parameter: record.parameter,
            pollutant: record.pollutant,
            index_value: record.index_value,
            concentration: record.concentration,
            date: record.date,
            quality: classification.quality_label().to_string(),
            risk: classification.risk_label().to_string(),
            latitude: station.map(|s| s.latitude),
            longitude: station.map(|s| s.longitude),
            municipality: station.map(|s| s.municipality.clone()),
            report_url: station.map(|s| s.report_url.clone()),
            extra,
        }
    }

    /// Cells for the fixed snapshot columns, in `SNAPSHOT_COLUMNS` order
    pub fn cells(&self) -> Vec<String> {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let number = |v: Option<f64>| v.map(|n| n.to_string()).unwrap_or_default();

        vec![
            self.station.clone(),
            text(&self.parameter),
            text(&self.pollutant),
            number(self.index_value),
            text(&self.concentration),
            text(&self.date),
            self.quality.clone(),
            self.risk.clone(),
            number(self.latitude),
            number(self.longitude),
            text(&self.municipality),
            text(&self.report_url),
        ]
    }
}

fn value_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Parse a numeric cell the way a coercing CSV reader would: anything that
/// is not a finite number becomes missing.
pub fn parse_numeric(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_numeric(&s),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_record_accepts_mixed_value_types() {
        let json = r#"[
            {"Estacion":"centro","Parameter":"PM10","HrAveData":"87","concentracion":41.5,"Date":"2024-05-01 13:00:00","extra":1},
            {"Estacion":"sur","Parameter":"O3","HrAveData":null,"Date":"2024-05-01 13:00:00"},
            {"Estacion":"norte","HrAveData":"N/D"}
        ]"#;

        let records: Vec<BulkRecord> = serde_json::from_str(json).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].index_value, Some(87.0));
        assert_eq!(records[0].concentration.as_deref(), Some("41.5"));
        assert_eq!(records[1].index_value, None);
        assert_eq!(records[2].index_value, None);
        assert_eq!(records[2].parameter, None);
        assert_eq!(records[0].extra.get("extra"), Some(&Value::from(1)));
        assert!(records[1].extra.is_empty());
    }

    #[test]
    fn test_snapshot_row_keeps_extra_fields_as_text() {
        let json = r#"{"Estacion":"centro","HrAveData":120,"Units":"ug/m3","Lluvia":0.2,"Viento":null}"#;
        let record: BulkRecord = serde_json::from_str(json).unwrap();

        let row = SnapshotRow::new(record, Classification::no_data(), None);

        assert_eq!(row.extra.get("Units").map(String::as_str), Some("ug/m3"));
        assert_eq!(row.extra.get("Lluvia").map(String::as_str), Some("0.2"));
        assert_eq!(row.extra.get("Viento").map(String::as_str), Some(""));
        assert_eq!(row.cells()[0], "centro");
        assert_eq!(row.cells()[3], "120");
    }

    #[test]
    fn test_index_record_without_parameter_is_skipped() {
        let record = IndexRecord {
            parameter: None,
            date: Some("2024-05-01 13:00:00".to_string()),
            index_value: Some(10.0),
        };

        assert!(Reading::from_index_record("centro", record).is_none());
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric(" 42.5 "), Some(42.5));
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("NaN"), None);
        assert_eq!(parse_numeric("abc"), None);
    }
}
