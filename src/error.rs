use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON decoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Pattern error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Embedded array '{variable}' not found in page")]
    PayloadNotFound { variable: String },

    #[error("Unparseable timestamp '{value}' for station {station}")]
    InvalidTimestamp { station: String, value: String },

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Missing mail credentials: {0}")]
    MissingCredentials(String),

    #[error("Station {slug} not found")]
    StationNotFound { slug: String },

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Mail message error: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}
