pub mod classifier;
pub mod enricher;
pub mod pivoter;
pub mod reconciler;

pub use classifier::classify;
pub use enricher::SnapshotEnricher;
pub use pivoter::WidePivoter;
pub use reconciler::{ArchiveUpdate, HistoryReconciler};
