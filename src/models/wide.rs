use std::fmt;
use std::str::FromStr;

use crate::error::{ProcessingError, Result};
use crate::models::reading::Reading;
use crate::utils::constants::{STATUS_COMPLETE, STATUS_INCOMPLETE};

/// Whether every parameter column of a wide row holds a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Completeness {
    Complete,
    Incomplete,
}

impl Completeness {
    pub fn from_values(values: &[Option<f64>]) -> Self {
        if values.iter().all(Option::is_some) {
            Completeness::Complete
        } else {
            Completeness::Incomplete
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Completeness::Complete => STATUS_COMPLETE,
            Completeness::Incomplete => STATUS_INCOMPLETE,
        }
    }
}

impl fmt::Display for Completeness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Completeness {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            STATUS_COMPLETE => Ok(Completeness::Complete),
            STATUS_INCOMPLETE => Ok(Completeness::Incomplete),
            other => Err(ProcessingError::InvalidFormat(format!(
                "Unknown completeness status: '{}'",
                other
            ))),
        }
    }
}

/// One (station, timestamp) row; `values` is aligned with the owning
/// table's `parameters`.
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub station: String,
    pub timestamp: String,
    pub values: Vec<Option<f64>>,
    pub status: Completeness,
}

/// Wide-format table: one column per parameter, sorted by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WideTable {
    pub parameters: Vec<String>,
    pub rows: Vec<WideRow>,
}

impl WideTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn value(&self, row: usize, parameter: &str) -> Option<f64> {
        let column = self.parameters.iter().position(|p| p == parameter)?;
        self.rows.get(row)?.values.get(column).copied().flatten()
    }

    pub fn complete_rows(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.status == Completeness::Complete)
            .count()
    }

    /// Melt back to long format, one reading per cell (missing cells included)
    pub fn to_readings(&self) -> Vec<Reading> {
        self.rows
            .iter()
            .flat_map(|row| {
                self.parameters
                    .iter()
                    .zip(&row.values)
                    .map(|(parameter, value)| Reading {
                        station: row.station.clone(),
                        parameter: parameter.clone(),
                        timestamp: row.timestamp.clone(),
                        value: *value,
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completeness_from_values() {
        assert_eq!(
            Completeness::from_values(&[Some(1.0), Some(2.0)]),
            Completeness::Complete
        );
        assert_eq!(
            Completeness::from_values(&[Some(1.0), None]),
            Completeness::Incomplete
        );
    }

    #[test]
    fn test_completeness_parse() {
        assert_eq!("completo".parse::<Completeness>().unwrap(), Completeness::Complete);
        assert_eq!(
            "incompleto".parse::<Completeness>().unwrap(),
            Completeness::Incomplete
        );
        assert!("true".parse::<Completeness>().is_err());
    }

    #[test]
    fn test_value_lookup() {
        let table = WideTable {
            parameters: vec!["O3".to_string(), "PM10".to_string()],
            rows: vec![WideRow {
                station: "centro".to_string(),
                timestamp: "2024-05-01 13:00:00".to_string(),
                values: vec![None, Some(55.0)],
                status: Completeness::Incomplete,
            }],
        };

        assert_eq!(table.value(0, "PM10"), Some(55.0));
        assert_eq!(table.value(0, "O3"), None);
        assert_eq!(table.value(0, "SO2"), None);
        assert_eq!(table.to_readings().len(), 2);
    }
}
