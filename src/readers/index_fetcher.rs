use chrono::Utc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::{IndexRecord, Reading, StationMetadata};
use crate::readers::http::{ensure_success, session_client};
use crate::registry::StationRegistry;
use crate::utils::constants::CACHE_BUST_PARAM;
use crate::utils::progress::FetchProgress;

/// Readings gathered by one pass over the registry
#[derive(Debug, Default)]
pub struct StationFetchReport {
    pub readings: Vec<Reading>,
    pub fetched: Vec<String>,
    pub failed: Vec<(String, String)>,
}

/// Fetches index readings station by station from the index API.
///
/// The API answers for whichever station the session last viewed, so each
/// station gets a fresh cookie-carrying client that first loads the
/// station's report page.
pub struct IndexFetcher {
    index_url: String,
    timeout: Duration,
}

impl IndexFetcher {
    pub fn new(index_url: &str, timeout: Duration) -> Self {
        Self {
            index_url: index_url.to_string(),
            timeout,
        }
    }

    pub async fn fetch_station(&self, station: &StationMetadata) -> Result<Vec<Reading>> {
        let client = session_client(self.timeout)?;

        debug!("Warming session for {} via {}", station.slug, station.report_url);
        client.get(&station.report_url).send().await?;

        let cache_bust = Utc::now().timestamp_millis();
        let response = client
            .get(&self.index_url)
            .query(&[(CACHE_BUST_PARAM, cache_bust)])
            .send()
            .await?;
        let body = ensure_success(response)?.text().await?;

        parse_index_response(&station.slug, &body)
    }

    /// Visit every station in registry order. A failing station is logged
    /// and skipped; the others are unaffected.
    pub async fn fetch_all(
        &self,
        registry: &StationRegistry,
        progress: &FetchProgress,
    ) -> StationFetchReport {
        let mut report = StationFetchReport::default();

        for station in registry.iter() {
            progress.station_started(&station.slug);

            match self.fetch_station(station).await {
                Ok(mut readings) => {
                    debug!("{}: {} readings", station.slug, readings.len());
                    report.readings.append(&mut readings);
                    report.fetched.push(station.slug.clone());
                    progress.station_finished();
                }
                Err(e) => {
                    warn!("Error with {}: {}", station.slug, e);
                    progress.station_failed(&station.slug, &e.to_string());
                    report.failed.push((station.slug.clone(), e.to_string()));
                }
            }
        }

        progress.finish(report.fetched.len(), report.failed.len());
        info!(
            "Fetched {} of {} stations ({} readings)",
            report.fetched.len(),
            registry.len(),
            report.readings.len()
        );

        report
    }
}

/// Decode an index API body into readings for `slug`. Values that are not
/// numbers become missing; records without parameter or date are dropped.
pub fn parse_index_response(slug: &str, body: &str) -> Result<Vec<Reading>> {
    let records: Vec<IndexRecord> = serde_json::from_str(body)?;
    let total = records.len();

    let readings: Vec<Reading> = records
        .into_iter()
        .filter_map(|record| Reading::from_index_record(slug, record))
        .collect();

    if readings.len() < total {
        debug!(
            "{}: dropped {} records without parameter or date",
            slug,
            total - readings.len()
        );
    }

    Ok(readings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_index_response() {
        let body = r#"[
            {"Parameter":"PM10","Date":"2024-05-01 13:00:00","HrAveData":"58","Units":"ug/m3"},
            {"Parameter":"O3","Date":"2024-05-01 13:00:00","HrAveData":""},
            {"Parameter":"SO2","Date":"2024-05-01 13:00:00","HrAveData":4.5}
        ]"#;

        let readings = parse_index_response("centro", body).unwrap();

        assert_eq!(readings.len(), 3);
        assert!(readings.iter().all(|r| r.station == "centro"));
        assert_eq!(readings[0].value, Some(58.0));
        assert_eq!(readings[1].value, None);
        assert_eq!(readings[2].value, Some(4.5));
    }

    #[test]
    fn test_parse_index_response_rejects_non_array() {
        assert!(parse_index_response("centro", "{\"error\":\"sin sesion\"}").is_err());
        assert!(parse_index_response("centro", "<html></html>").is_err());
    }

    #[test]
    fn test_parse_index_response_drops_incomplete_records() {
        let body = r#"[{"Date":"2024-05-01 13:00:00","HrAveData":3},{"Parameter":"CO","HrAveData":1}]"#;

        assert!(parse_index_response("sur", body).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_stations_are_skipped() {
        let registry = StationRegistry::from_stations(vec![
            StationMetadata::new(
                "centro",
                "CENTRO",
                4,
                "CE",
                25.6760139,
                -100.338553,
                "Monterrey",
                "http://127.0.0.1:1/reporte?estacion1=CENTRO",
            ),
            StationMetadata::new(
                "sur",
                "SUR",
                13,
                "S",
                25.6169806,
                -100.273936,
                "Monterrey",
                "http://127.0.0.1:1/reporte?estacion1=SUR",
            ),
        ])
        .unwrap();

        let fetcher = IndexFetcher::new("http://127.0.0.1:1/api_indice.php", Duration::from_secs(2));
        let report = fetcher
            .fetch_all(&registry, &FetchProgress::new(registry.len() as u64, true))
            .await;

        assert!(report.readings.is_empty());
        assert!(report.fetched.is_empty());
        let failed: Vec<&str> = report.failed.iter().map(|(slug, _)| slug.as_str()).collect();
        assert_eq!(failed, vec!["centro", "sur"]);
    }
}
