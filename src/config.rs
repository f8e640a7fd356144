//! Runtime configuration.
//!
//! Settings come from built-in defaults, then an optional TOML file, then
//! `SIMA_*` environment variables. Mail credentials are read separately from
//! `SMTP_USER`, `SMTP_PASS` and `ALERT_TO_EMAIL`.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::utils::constants::*;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    /// Network map page embedding every station's reading
    #[validate(length(min = 1))]
    pub bulk_url: String,

    /// JS variable holding the embedded readings
    #[validate(length(min = 1))]
    pub bulk_variable: String,

    /// Per-station index API
    #[validate(length(min = 1))]
    pub index_url: String,

    pub snapshot_csv: PathBuf,
    pub wide_csv: PathBuf,
    pub history_csv: PathBuf,

    /// Replacement station table; the built-in table is used when unset
    #[serde(default)]
    pub stations_csv: Option<PathBuf>,

    #[validate(range(min = 1, max = 300))]
    pub request_timeout_secs: u64,

    #[validate(length(min = 1))]
    pub smtp_host: String,

    #[validate(range(min = 1))]
    pub smtp_port: u16,
}

impl Settings {
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("bulk_url", BULK_SOURCE_URL)?
            .set_default("bulk_variable", BULK_ARRAY_VARIABLE)?
            .set_default("index_url", INDEX_API_URL)?
            .set_default("snapshot_csv", SNAPSHOT_FILE)?
            .set_default("wide_csv", WIDE_FILE)?
            .set_default("history_csv", HISTORY_FILE)?
            .set_default("request_timeout_secs", DEFAULT_TIMEOUT_SECS as i64)?
            .set_default("smtp_host", DEFAULT_SMTP_HOST)?
            .set_default("smtp_port", DEFAULT_SMTP_PORT as i64)?;

        if let Some(path) = config_file {
            debug!("Loading settings from {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings: Settings = builder
            .add_source(Environment::with_prefix("SIMA").try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bulk_url: BULK_SOURCE_URL.to_string(),
            bulk_variable: BULK_ARRAY_VARIABLE.to_string(),
            index_url: INDEX_API_URL.to_string(),
            snapshot_csv: PathBuf::from(SNAPSHOT_FILE),
            wide_csv: PathBuf::from(WIDE_FILE),
            history_csv: PathBuf::from(HISTORY_FILE),
            stations_csv: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
        }
    }
}

/// Relay login and alert recipient
#[derive(Clone, PartialEq)]
pub struct MailCredentials {
    pub user: String,
    pub password: String,
    pub recipient: String,
}

impl MailCredentials {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve credentials through `lookup`; every absent or blank variable
    /// is named in the error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let user = get(ENV_SMTP_USER);
        let password = get(ENV_SMTP_PASS);
        let recipient = get(ENV_ALERT_TO);

        match (user, password, recipient) {
            (Some(user), Some(password), Some(recipient)) => Ok(Self {
                user,
                password,
                recipient,
            }),
            (user, password, recipient) => {
                let missing: Vec<&str> = [
                    (ENV_SMTP_USER, user.is_none()),
                    (ENV_SMTP_PASS, password.is_none()),
                    (ENV_ALERT_TO, recipient.is_none()),
                ]
                .into_iter()
                .filter(|(_, absent)| *absent)
                .map(|(name, _)| name)
                .collect();
                Err(ProcessingError::MissingCredentials(missing.join(", ")))
            }
        }
    }
}

impl fmt::Debug for MailCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailCredentials")
            .field("user", &self.user)
            .field("password", &"***")
            .field("recipient", &self.recipient)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file() -> NamedTempFile {
        tempfile::Builder::new().suffix(".toml").tempfile().unwrap()
    }

    #[test]
    fn test_defaults_validate() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = toml_file();
        writeln!(file, "history_csv = \"data/historico.csv\"").unwrap();
        writeln!(file, "request_timeout_secs = 25").unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();

        assert_eq!(settings.history_csv, PathBuf::from("data/historico.csv"));
        assert_eq!(settings.timeout(), Duration::from_secs(25));
        assert_eq!(settings.bulk_variable, "arrayIMKTodo11");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut file = toml_file();
        writeln!(file, "request_timeout_secs = 0").unwrap();

        assert!(Settings::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_credentials_complete() {
        let env: HashMap<&str, &str> = [
            ("SMTP_USER", "alertas@example.com"),
            ("SMTP_PASS", "secreto"),
            ("ALERT_TO_EMAIL", "equipo@example.com"),
        ]
        .into_iter()
        .collect();

        let creds = MailCredentials::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(creds.user, "alertas@example.com");
        assert!(!format!("{:?}", creds).contains("secreto"));
    }

    #[test]
    fn test_credentials_missing_are_named() {
        let result = MailCredentials::from_lookup(|k| match k {
            "SMTP_USER" => Some("alertas@example.com".to_string()),
            "SMTP_PASS" => Some("   ".to_string()),
            _ => None,
        });

        match result {
            Err(ProcessingError::MissingCredentials(names)) => {
                assert_eq!(names, "SMTP_PASS, ALERT_TO_EMAIL");
            }
            other => panic!("expected MissingCredentials, got {:?}", other),
        }
    }
}
