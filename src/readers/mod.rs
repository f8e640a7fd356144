pub mod bulk_fetcher;
pub mod embedded_array;
pub mod history_reader;
pub mod http;
pub mod index_fetcher;
pub mod snapshot_reader;
pub mod station_reader;

pub use bulk_fetcher::BulkFetcher;
pub use history_reader::HistoryReader;
pub use index_fetcher::{parse_index_response, IndexFetcher, StationFetchReport};
pub use snapshot_reader::{SnapshotReader, SnapshotTable};
pub use station_reader::StationReader;
