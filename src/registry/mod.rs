//! Immutable station lookup keyed by slug.

mod builtin;

use std::collections::HashMap;
use std::sync::OnceLock;
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::models::StationMetadata;

pub use builtin::builtin_stations;

#[derive(Debug, Clone)]
pub struct StationRegistry {
    stations: Vec<StationMetadata>,
    by_slug: HashMap<String, usize>,
}

impl StationRegistry {
    /// Build a registry, validating every entry and rejecting duplicate slugs
    pub fn from_stations(stations: Vec<StationMetadata>) -> Result<Self> {
        let mut by_slug = HashMap::with_capacity(stations.len());

        for (position, station) in stations.iter().enumerate() {
            station.validate()?;
            if by_slug.insert(station.slug.clone(), position).is_some() {
                return Err(ProcessingError::InvalidFormat(format!(
                    "Duplicate station slug: '{}'",
                    station.slug
                )));
            }
        }

        Ok(Self { stations, by_slug })
    }

    /// The built-in network table, constructed once per process
    pub fn builtin() -> &'static StationRegistry {
        static REGISTRY: OnceLock<StationRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let stations = builtin_stations();
            let by_slug = stations
                .iter()
                .enumerate()
                .map(|(position, s)| (s.slug.clone(), position))
                .collect();
            StationRegistry { stations, by_slug }
        })
    }

    pub fn get(&self, slug: &str) -> Option<&StationMetadata> {
        self.by_slug.get(slug).map(|&i| &self.stations[i])
    }

    pub fn require(&self, slug: &str) -> Result<&StationMetadata> {
        self.get(slug).ok_or_else(|| ProcessingError::StationNotFound {
            slug: slug.to_string(),
        })
    }

    /// Stations in registration order
    pub fn iter(&self) -> impl Iterator<Item = &StationMetadata> {
        self.stations.iter()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_lookup() {
        let registry = StationRegistry::builtin();

        assert_eq!(registry.len(), 15);

        let garcia = registry.get("noroeste2").unwrap();
        assert_eq!(garcia.name, "NOROESTE 2");
        assert_eq!(garcia.municipality, "García");
        assert_eq!(garcia.code, "NO2");
        assert!(garcia.report_url.ends_with("estacion1=GARCIA"));

        assert!(registry.get("atlantis").is_none());
        assert!(registry.require("atlantis").is_err());
    }

    #[test]
    fn test_builtin_entries_are_valid() {
        for station in builtin_stations() {
            assert!(station.validate().is_ok(), "invalid entry {}", station.slug);
        }
        assert!(StationRegistry::from_stations(builtin_stations()).is_ok());
    }

    #[test]
    fn test_iteration_keeps_network_order() {
        let slugs: Vec<&str> = StationRegistry::builtin()
            .iter()
            .map(|s| s.slug.as_str())
            .take(3)
            .collect();

        assert_eq!(slugs, vec!["centro", "sureste", "noreste"]);
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let mut stations = builtin_stations();
        stations.push(stations[0].clone());

        assert!(StationRegistry::from_stations(stations).is_err());
    }
}
