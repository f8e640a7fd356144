use tracing::debug;

use crate::models::{BulkRecord, SnapshotRow};
use crate::processors::classifier::classify;
use crate::registry::StationRegistry;

/// Classifies bulk records and joins them with station reference data
pub struct SnapshotEnricher<'a> {
    registry: &'a StationRegistry,
}

impl<'a> SnapshotEnricher<'a> {
    pub fn new(registry: &'a StationRegistry) -> Self {
        Self { registry }
    }

    /// Left join on slug: records for unknown stations keep empty
    /// location fields but are not dropped.
    pub fn enrich(&self, records: Vec<BulkRecord>) -> Vec<SnapshotRow> {
        records
            .into_iter()
            .map(|record| {
                let station = self.registry.get(&record.station);
                if station.is_none() {
                    debug!("No registry entry for station '{}'", record.station);
                }
                let classification = classify(record.index_value);
                SnapshotRow::new(record, classification, station)
            })
            .collect()
    }
}
