use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sima-processor")]
#[command(about = "Air-quality snapshot, history and alert processor for the SIMA monitoring network")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Only log warnings and errors, no progress bar")]
    pub quiet: bool,

    #[arg(short, long, global = true, help = "TOML settings file")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the network page, classify every reading and write the snapshot CSV
    Snapshot {
        #[arg(short, long, help = "Snapshot CSV path [default: aire_monterrey.csv]")]
        output: Option<PathBuf>,

        #[arg(long, help = "Station table CSV replacing the built-in registry")]
        stations: Option<PathBuf>,
    },

    /// Fetch per-station index data, write the wide CSV and update the archive
    Index {
        #[arg(short, long, help = "Wide CSV path [default: aire_indice_api_ancho.csv]")]
        wide_output: Option<PathBuf>,

        #[arg(long, help = "Historical archive CSV path")]
        history: Option<PathBuf>,

        #[arg(long, help = "Station table CSV replacing the built-in registry")]
        stations: Option<PathBuf>,
    },

    /// Email an alert for stations with critical air quality
    Alert {
        #[arg(short, long, help = "Snapshot CSV to read")]
        snapshot: Option<PathBuf>,

        #[arg(long, help = "Also write the rendered HTML document here")]
        html_output: Option<PathBuf>,

        #[arg(long, default_value = "false", help = "Render without credentials or sending")]
        dry_run: bool,
    },

    /// Run snapshot, alert and index in sequence
    Run,

    /// Summarise the historical archive
    Info {
        #[arg(long, help = "Historical archive CSV path")]
        history: Option<PathBuf>,

        #[arg(short, long, default_value = "10")]
        sample: usize,
    },
}
