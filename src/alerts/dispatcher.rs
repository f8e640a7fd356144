use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::alerts::mailer::Mailer;
use crate::alerts::renderer::AlertRenderer;
use crate::config::MailCredentials;
use crate::error::{ProcessingError, Result};
use crate::models::QualityLevel;
use crate::readers::{SnapshotReader, SnapshotTable};
use crate::utils::constants::COL_QUALITY;

/// What the alert stage should do with a snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum AlertPlan {
    SnapshotMissing(PathBuf),
    MissingQualityColumn,
    NoCriticalStations,
    /// Snapshot restricted to the rows with a critical quality label
    Alert(SnapshotTable),
}

/// Decide whether `snapshot` warrants an alert.
pub fn plan_alerts(snapshot: &Path) -> Result<AlertPlan> {
    if !snapshot.exists() {
        return Ok(AlertPlan::SnapshotMissing(snapshot.to_path_buf()));
    }

    let table = SnapshotReader::new().read(snapshot)?;
    let Some(quality) = table.column(COL_QUALITY) else {
        return Ok(AlertPlan::MissingQualityColumn);
    };

    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .filter(|row| {
            row.get(quality)
                .and_then(|label| label.trim().parse::<QualityLevel>().ok())
                .map_or(false, |level| level.is_critical())
        })
        .cloned()
        .collect();

    if rows.is_empty() {
        return Ok(AlertPlan::NoCriticalStations);
    }

    Ok(AlertPlan::Alert(SnapshotTable {
        headers: table.headers,
        rows,
    }))
}

/// How an alert run ended. Every variant is a clean exit.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertOutcome {
    SnapshotMissing(PathBuf),
    MissingQualityColumn,
    NoCriticalStations,
    MissingCredentials(String),
    DryRun { stations: usize },
    Sent { stations: usize },
    SendFailed { stations: usize, reason: String },
}

impl AlertOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            AlertOutcome::MissingCredentials(_) | AlertOutcome::SendFailed { .. }
        )
    }
}

impl fmt::Display for AlertOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertOutcome::SnapshotMissing(path) => {
                write!(f, "Snapshot {} not found, no alert sent", path.display())
            }
            AlertOutcome::MissingQualityColumn => {
                write!(f, "Snapshot has no '{}' column, no alert sent", COL_QUALITY)
            }
            AlertOutcome::NoCriticalStations => {
                write!(f, "No stations with critical air quality, no alert sent")
            }
            AlertOutcome::MissingCredentials(names) => {
                write!(f, "Missing mail credentials ({}), no alert sent", names)
            }
            AlertOutcome::DryRun { stations } => {
                write!(f, "Dry run: alert for {} station rows rendered, not sent", stations)
            }
            AlertOutcome::Sent { stations } => {
                write!(f, "Alert sent for {} station rows", stations)
            }
            AlertOutcome::SendFailed { stations, reason } => {
                write!(f, "Alert for {} station rows failed to send: {}", stations, reason)
            }
        }
    }
}

/// Runs the alert stage: plan, check credentials, render, send
pub struct AlertDispatcher {
    smtp_host: String,
    smtp_port: u16,
    html_output: Option<PathBuf>,
    dry_run: bool,
}

impl AlertDispatcher {
    pub fn new(smtp_host: &str, smtp_port: u16) -> Self {
        Self {
            smtp_host: smtp_host.to_string(),
            smtp_port,
            html_output: None,
            dry_run: false,
        }
    }

    /// Also write the rendered document to `path`
    pub fn with_html_output(mut self, path: Option<PathBuf>) -> Self {
        self.html_output = path;
        self
    }

    /// Render without credentials and without sending
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub async fn dispatch(
        &self,
        snapshot: &Path,
        credentials: Result<MailCredentials>,
    ) -> Result<AlertOutcome> {
        let table = match plan_alerts(snapshot)? {
            AlertPlan::Alert(table) => table,
            AlertPlan::SnapshotMissing(path) => return Ok(AlertOutcome::SnapshotMissing(path)),
            AlertPlan::MissingQualityColumn => return Ok(AlertOutcome::MissingQualityColumn),
            AlertPlan::NoCriticalStations => return Ok(AlertOutcome::NoCriticalStations),
        };
        let stations = table.len();
        info!("{} station rows with critical air quality", stations);

        let credentials = if self.dry_run {
            None
        } else {
            match credentials {
                Ok(credentials) => Some(credentials),
                Err(ProcessingError::MissingCredentials(names)) => {
                    warn!("Mail credentials not configured: {}", names);
                    return Ok(AlertOutcome::MissingCredentials(names));
                }
                Err(e) => return Err(e),
            }
        };

        let source_name = snapshot
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| snapshot.display().to_string());
        let renderer = AlertRenderer::new(&source_name);
        let html = renderer.render_document(&table);

        if let Some(path) = &self.html_output {
            fs::write(path, &html)?;
            info!("Alert document written to {}", path.display());
        }

        let Some(credentials) = credentials else {
            return Ok(AlertOutcome::DryRun { stations });
        };

        let mailer = Mailer::new(&self.smtp_host, self.smtp_port, credentials);
        let message = mailer.build_message(html, renderer.render_plain(&table))?;

        match mailer.send(message).await {
            Ok(()) => {
                info!("Alert email sent");
                Ok(AlertOutcome::Sent { stations })
            }
            Err(e) => {
                error!("Failed to send alert email: {}", e);
                Ok(AlertOutcome::SendFailed {
                    stations,
                    reason: e.to_string(),
                })
            }
        }
    }
}
