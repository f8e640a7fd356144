use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::models::{Completeness, Reading, WideRow, WideTable};

/// Reshapes long-format readings into one row per (station, timestamp)
pub struct WidePivoter;

impl WidePivoter {
    pub fn new() -> Self {
        Self
    }

    /// Pivot readings into a wide table.
    ///
    /// Parameter columns are every parameter name seen in the input, sorted.
    /// Rows come out ordered by (station, timestamp text). Within a group
    /// the first non-missing value for a parameter wins.
    pub fn pivot(&self, readings: &[Reading]) -> WideTable {
        if readings.is_empty() {
            return WideTable::default();
        }

        let parameters: Vec<String> = readings
            .iter()
            .map(|r| r.parameter.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let columns: HashMap<&str, usize> = parameters
            .iter()
            .enumerate()
            .map(|(i, p)| (p.as_str(), i))
            .collect();

        let grouped = self.group_by_station_and_timestamp(readings, &columns);

        let rows = grouped
            .into_iter()
            .map(|((station, timestamp), values)| WideRow {
                station: station.to_string(),
                timestamp: timestamp.to_string(),
                status: Completeness::from_values(&values),
                values,
            })
            .collect();

        WideTable { parameters, rows }
    }

    fn group_by_station_and_timestamp<'r>(
        &self,
        readings: &'r [Reading],
        columns: &HashMap<&str, usize>,
    ) -> BTreeMap<(&'r str, &'r str), Vec<Option<f64>>> {
        let mut grouped: BTreeMap<(&str, &str), Vec<Option<f64>>> = BTreeMap::new();

        for reading in readings {
            let values = grouped
                .entry((reading.station.as_str(), reading.timestamp.as_str()))
                .or_insert_with(|| vec![None; columns.len()]);

            let slot = &mut values[columns[reading.parameter.as_str()]];
            if slot.is_none() {
                *slot = reading.value;
            }
        }

        grouped
    }
}

impl Default for WidePivoter {
    fn default() -> Self {
        Self::new()
    }
}
