use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress display for the sequential per-station fetch loop
pub struct FetchProgress {
    progress_bar: Option<ProgressBar>,
}

impl FetchProgress {
    pub fn new(total_stations: u64, silent: bool) -> Self {
        if silent {
            return Self { progress_bar: None };
        }

        let pb = ProgressBar::new(total_stations);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(100));

        Self {
            progress_bar: Some(pb),
        }
    }

    pub fn station_started(&self, slug: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_message(format!("→ {}", slug));
        }
    }

    pub fn station_finished(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(1);
        }
    }

    /// Print above the bar so failures are not overwritten by the spinner
    pub fn station_failed(&self, slug: &str, reason: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.println(format!("⚠ {}: {}", slug, reason));
            pb.inc(1);
        }
    }

    pub fn finish(&self, fetched: usize, failed: usize) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_with_message(format!("{} stations fetched, {} failed", fetched, failed));
        }
    }
}

impl Drop for FetchProgress {
    fn drop(&mut self) {
        if let Some(ref pb) = self.progress_bar {
            if !pb.is_finished() {
                pb.finish_and_clear();
            }
        }
    }
}
