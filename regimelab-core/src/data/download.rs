//! Download orchestrator: fetch, ingest, and cache several symbols with progress reporting.

use super::cache::{CoverageResult, ParquetCache};
use super::ingest;
use super::provider::{DataError, DataProvider};
use chrono::NaiveDate;
use tracing::info;

/// Download every symbol through fetch → ingest → cache.
///
/// Symbols whose cached range already covers `[start, end]` are skipped
/// unless `force` is set. If the provider becomes unavailable mid-batch the
/// remaining symbols are failed without being attempted.
pub fn download_symbols(
    provider: &dyn DataProvider,
    cache: &ParquetCache,
    symbols: &[&str],
    start: NaiveDate,
    end: NaiveDate,
    force: bool,
    progress: &dyn DownloadProgress,
) -> DownloadSummary {
    let total = symbols.len();
    let mut succeeded = 0;
    let mut errors: Vec<(String, DataError)> = Vec::new();

    for (i, symbol) in symbols.iter().enumerate() {
        progress.on_start(symbol, i, total);

        if !force && cache.covers_range(symbol, start, end) == CoverageResult::FullyCovered {
            info!(symbol, "cache already covers requested range");
            progress.on_complete(symbol, &Ok(()));
            succeeded += 1;
            continue;
        }

        let result = download_single(provider, cache, symbol, start, end);
        progress.on_complete(symbol, &result);

        match result {
            Ok(()) => succeeded += 1,
            Err(e) => errors.push((symbol.to_string(), e)),
        }

        if !provider.is_available() {
            for sym in &symbols[(i + 1)..] {
                errors.push((sym.to_string(), DataError::CircuitBreakerTripped));
            }
            break;
        }
    }

    let summary = DownloadSummary {
        total,
        succeeded,
        failed: errors.len(),
        errors,
    };
    progress.on_batch_complete(&summary);
    summary
}

/// Fetch one symbol, validate it, and write it to the cache.
pub fn download_single(
    provider: &dyn DataProvider,
    cache: &ParquetCache,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), DataError> {
    let fetched = provider.fetch(symbol, start, end)?;
    let ingested = ingest::ingest(fetched.bars)?;
    cache.write(symbol, &ingested.prices, fetched.source, start, end)?;
    info!(
        symbol,
        provider = provider.name(),
        points = ingested.prices.len(),
        "downloaded price series"
    );
    Ok(())
}

/// Receives per-symbol events from [`download_symbols`].
pub trait DownloadProgress: Send {
    fn on_start(&self, symbol: &str, index: usize, total: usize);

    fn on_complete(&self, symbol: &str, result: &Result<(), DataError>);

    fn on_batch_complete(&self, summary: &DownloadSummary);
}

/// Prints one line per symbol and a closing tally.
pub struct StdoutProgress;

impl DownloadProgress for StdoutProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        println!("[{}/{total}] {symbol}", index + 1);
    }

    fn on_complete(&self, symbol: &str, result: &Result<(), DataError>) {
        match result {
            Ok(()) => println!("  cached {symbol}"),
            Err(e) => println!("  {symbol} failed: {e}"),
        }
    }

    fn on_batch_complete(&self, summary: &DownloadSummary) {
        println!(
            "\n{} of {} indices cached, {} failed",
            summary.succeeded, summary.total, summary.failed
        );
    }
}

/// Summary of a batch download operation.
#[derive(Debug)]
pub struct DownloadSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<(String, DataError)>,
}

impl DownloadSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}
