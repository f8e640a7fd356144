use serde::{Deserialize, Serialize};
use validator::Validate;

/// Reference data for one monitoring station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StationMetadata {
    #[validate(length(min = 1))]
    pub slug: String,

    #[validate(length(min = 1))]
    pub name: String,

    pub id: u32,

    /// Short network code, e.g. `CE` or `NO2`
    pub code: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    pub municipality: String,

    #[validate(length(min = 1))]
    pub report_url: String,
}

impl StationMetadata {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        slug: &str,
        name: &str,
        id: u32,
        code: &str,
        latitude: f64,
        longitude: f64,
        municipality: &str,
        report_url: &str,
    ) -> Self {
        Self {
            slug: slug.to_string(),
            name: name.to_string(),
            id,
            code: code.to_string(),
            latitude,
            longitude,
            municipality: municipality.to_string(),
            report_url: report_url.to_string(),
        }
    }
}
