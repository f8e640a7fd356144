use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::BulkRecord;
use crate::readers::embedded_array::extract_records;
use crate::readers::http::{build_client, ensure_success};

/// Fetches every station's current reading from the network map page in
/// one request
pub struct BulkFetcher {
    client: Client,
    url: String,
    variable: String,
}

impl BulkFetcher {
    pub fn new(url: &str, variable: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            url: url.to_string(),
            variable: variable.to_string(),
        })
    }

    pub async fn fetch_page(&self) -> Result<String> {
        debug!("Requesting bulk page {}", self.url);
        let response = ensure_success(self.client.get(&self.url).send().await?)?;
        Ok(response.text().await?)
    }

    /// Decode the embedded readings from an already downloaded page
    pub fn parse_page(&self, html: &str) -> Result<Vec<BulkRecord>> {
        extract_records(html, &self.variable)
    }

    /// Either every record is returned or the run fails; no partial snapshot.
    pub async fn fetch(&self) -> Result<Vec<BulkRecord>> {
        let html = self.fetch_page().await?;
        let records = self.parse_page(&html)?;
        info!("{} read correctly: {} records", self.variable, records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessingError;

    fn fetcher() -> BulkFetcher {
        BulkFetcher::new("http://localhost/unused", "arrayIMKTodo11", Duration::from_secs(1))
            .unwrap()
    }

    #[test]
    fn test_parse_page() {
        let html = r#"<html><script>
            const arrayIMKTodo11 = [{"Estacion":"norte","Parameter":"PM2.5","contaminante":"PM2.5","HrAveData":"64","concentracion":"22.1","Date":"2024-05-01 13:00:00"}];
        </script></html>"#;

        let records = fetcher().parse_page(html).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].station, "norte");
        assert_eq!(records[0].index_value, Some(64.0));
        assert_eq!(records[0].concentration.as_deref(), Some("22.1"));
    }

    #[test]
    fn test_parse_page_without_array() {
        let result = fetcher().parse_page("<html>mantenimiento</html>");
        assert!(matches!(result, Err(ProcessingError::PayloadNotFound { .. })));
    }
}
