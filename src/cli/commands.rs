use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::alerts::{AlertDispatcher, AlertOutcome};
use crate::analyzers::HistoryAnalyzer;
use crate::cli::args::{Cli, Commands};
use crate::config::{MailCredentials, Settings};
use crate::error::Result;
use crate::models::HistoryTable;
use crate::processors::{ArchiveUpdate, HistoryReconciler, SnapshotEnricher, WidePivoter};
use crate::readers::{BulkFetcher, HistoryReader, IndexFetcher, StationReader};
use crate::registry::StationRegistry;
use crate::utils::constants::ARCHIVE_TIMESTAMP_FORMAT;
use crate::utils::progress::FetchProgress;
use crate::writers::CsvWriter;

pub async fn run(cli: Cli) -> Result<()> {
    setup_logging(&cli);

    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Snapshot { output, stations } => {
            let registry = load_registry(stations.as_deref(), &settings)?;
            let output = output.unwrap_or_else(|| settings.snapshot_csv.clone());
            let rows = run_snapshot(&settings, &registry, &output).await?;
            println!("Snapshot: {} rows written to {}", rows, output.display());
        }

        Commands::Index {
            wide_output,
            history,
            stations,
        } => {
            let registry = load_registry(stations.as_deref(), &settings)?;
            let wide = wide_output.unwrap_or_else(|| settings.wide_csv.clone());
            let history = history.unwrap_or_else(|| settings.history_csv.clone());
            let update = run_index(&settings, &registry, &wide, &history, cli.quiet).await?;
            print_archive_update(&update, &history);
        }

        Commands::Alert {
            snapshot,
            html_output,
            dry_run,
        } => {
            let snapshot = snapshot.unwrap_or_else(|| settings.snapshot_csv.clone());
            let outcome = run_alert(&settings, &snapshot, html_output, dry_run).await?;
            println!("{}", outcome);
        }

        Commands::Run => {
            let registry = load_registry(None, &settings)?;

            let rows = run_snapshot(&settings, &registry, &settings.snapshot_csv).await?;
            println!(
                "Snapshot: {} rows written to {}",
                rows,
                settings.snapshot_csv.display()
            );

            // An alert that ends early does not stop the index stage
            let outcome = run_alert(&settings, &settings.snapshot_csv, None, false).await?;
            println!("{}", outcome);

            let update = run_index(
                &settings,
                &registry,
                &settings.wide_csv,
                &settings.history_csv,
                cli.quiet,
            )
            .await?;
            print_archive_update(&update, &settings.history_csv);
        }

        Commands::Info { history, sample } => {
            let history = history.unwrap_or_else(|| settings.history_csv.clone());
            println!("Analyzing archive: {}", history.display());

            let table = HistoryReader::new().read(&history)?;
            let stats = HistoryAnalyzer::new().analyze(&table)?;
            println!("\n{}", stats.detailed_summary());

            if sample > 0 {
                print_sample(&table, sample);
            }
        }
    }

    Ok(())
}

/// Fetch the network page, classify and enrich every reading and replace
/// the snapshot at `output`. Returns the number of rows written.
pub async fn run_snapshot(
    settings: &Settings,
    registry: &StationRegistry,
    output: &Path,
) -> Result<usize> {
    let fetcher = BulkFetcher::new(&settings.bulk_url, &settings.bulk_variable, settings.timeout())?;
    let records = fetcher.fetch().await?;

    let rows = SnapshotEnricher::new(registry).enrich(records);
    CsvWriter::new().write_snapshot(&rows, output)?;

    info!("Snapshot saved to {}", output.display());
    Ok(rows.len())
}

/// Fetch every station's index data, write the current wide table and merge
/// it into the archive.
pub async fn run_index(
    settings: &Settings,
    registry: &StationRegistry,
    wide_output: &Path,
    history: &Path,
    quiet: bool,
) -> Result<ArchiveUpdate> {
    let progress = FetchProgress::new(registry.len() as u64, quiet);
    let report = IndexFetcher::new(&settings.index_url, settings.timeout())
        .fetch_all(registry, &progress)
        .await;

    for (slug, reason) in &report.failed {
        warn!("Station {} skipped: {}", slug, reason);
    }

    let wide = WidePivoter::new().pivot(&report.readings);
    CsvWriter::new().write_wide(&wide, wide_output)?;
    info!(
        "Wide table saved to {} ({} rows, {} complete)",
        wide_output.display(),
        wide.len(),
        wide.complete_rows()
    );

    HistoryReconciler::new().update_archive(history, &wide)
}

/// Plan and, when warranted, send the critical-quality alert for `snapshot`.
pub async fn run_alert(
    settings: &Settings,
    snapshot: &Path,
    html_output: Option<PathBuf>,
    dry_run: bool,
) -> Result<AlertOutcome> {
    let outcome = AlertDispatcher::new(&settings.smtp_host, settings.smtp_port)
        .with_html_output(html_output)
        .with_dry_run(dry_run)
        .dispatch(snapshot, MailCredentials::from_env())
        .await?;

    if outcome.is_failure() {
        warn!("{}", outcome);
    } else {
        info!("{}", outcome);
    }
    Ok(outcome)
}

/// `--stations` wins over the configured table, which wins over the built-in one
fn load_registry(stations: Option<&Path>, settings: &Settings) -> Result<StationRegistry> {
    match stations.or(settings.stations_csv.as_deref()) {
        Some(path) => {
            info!("Loading stations from {}", path.display());
            StationReader::new().read_registry(path)
        }
        None => Ok(StationRegistry::builtin().clone()),
    }
}

fn print_archive_update(update: &ArchiveUpdate, history: &Path) {
    println!(
        "Archive {}: {} rows total ({} added, {} replaced)",
        history.display(),
        update.total_rows,
        update.added_rows(),
        update.replaced_rows
    );
}

fn print_sample(table: &HistoryTable, sample: usize) {
    println!("\nSample Rows (showing {} rows):", sample.min(table.len()));

    for (i, row) in table.rows.iter().take(sample).enumerate() {
        let values = table
            .parameters
            .iter()
            .map(|p| match row.value(p) {
                Some(v) => format!("{}={}", p, v),
                None => format!("{}=-", p),
            })
            .collect::<Vec<_>>()
            .join(", ");

        println!(
            "{}. {} at {}: {} ({})",
            i + 1,
            row.station,
            row.timestamp.format(ARCHIVE_TIMESTAMP_FORMAT),
            values,
            row.status
        );
    }
}

fn setup_logging(cli: &Cli) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sima_processor={}", cli.get_log_level())));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}
