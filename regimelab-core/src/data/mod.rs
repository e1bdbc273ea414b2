//! Price data: providers, ingest, caching, and the presidency reference table.

pub mod cache;
pub mod circuit_breaker;
pub mod csv_import;
pub mod download;
pub mod ingest;
pub mod presidents;
pub mod provider;
pub mod yahoo;

pub use cache::{CacheMeta, CoverageResult, ParquetCache};
pub use circuit_breaker::CircuitBreaker;
pub use csv_import::CsvProvider;
pub use download::{
    download_single, download_symbols, DownloadProgress, DownloadSummary, StdoutProgress,
};
pub use ingest::{ingest, IngestResult};
pub use presidents::{load_presidents, read_presidents};
pub use provider::{DataError, DataProvider, DataSource, FetchResult, RawBar};
pub use yahoo::YahooProvider;
