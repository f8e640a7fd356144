pub mod history_analyzer;

pub use history_analyzer::{ArchiveStatistics, HistoryAnalyzer};
