//! Price sources for index closes and the errors of the data layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw daily close from a data provider, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub close: f64,
    pub adj_close: f64,
}

impl RawBar {
    /// Adjusted close if present, otherwise the plain close.
    ///
    /// Index series usually carry identical values in both columns; older
    /// exports sometimes leave `Adj Close` blank.
    pub fn best_close(&self) -> f64 {
        if self.adj_close.is_finite() {
            self.adj_close
        } else {
            self.close
        }
    }
}

/// Failures while fetching, importing, or caching index closes.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("provider throttled requests for '{symbol}'")]
    RateLimited { symbol: String },

    #[error("unexpected provider response: {0}")]
    ResponseFormatChanged(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("unknown index symbol '{symbol}'")]
    SymbolNotFound { symbol: String },

    #[error("provider has blocked further requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("cache error: {0}")]
    CacheError(String),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("parquet I/O error: {0}")]
    ParquetError(String),

    #[error("import error: {0}")]
    ImportError(String),

    #[error("no cached closes for '{symbol}', run `regimelab download {symbol}` first")]
    NoCachedData { symbol: String },
}

/// Closes returned by one fetch.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub bars: Vec<RawBar>,
    pub source: DataSource,
}

/// Provenance of a price series, carried into every exported artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    CsvImport,
    Cache,
    Synthetic,
}

/// A source of daily index closes. Caching is layered on top by callers.
pub trait DataProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Daily closes for `symbol` over the inclusive range `[start, end]`.
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError>;

    /// False once the provider has stopped accepting requests.
    fn is_available(&self) -> bool;
}
