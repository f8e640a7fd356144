pub mod history;
pub mod quality;
pub mod reading;
pub mod station;
pub mod wide;

pub use history::{parse_timestamp, HistoryRow, HistoryTable};
pub use quality::{Classification, QualityLevel, RiskLevel};
pub use reading::{BulkRecord, IndexRecord, Reading, SnapshotRow};
pub use station::StationMetadata;
pub use wide::{Completeness, WideRow, WideTable};
