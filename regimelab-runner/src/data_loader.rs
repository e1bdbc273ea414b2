//! Price loading and data resolution for a study.
//!
//! Given an index symbol, loads adjusted closes from the Parquet cache.
//! Implements the fallback policy:
//! 1. If the cache was filled for a range spanning the request → use it
//! 2. Otherwise, if a provider is available → fetch, ingest, and cache
//! 3. If no data and `--synthetic` → generate a synthetic series (tagged)
//! 4. Otherwise → fail with a clear error
//!
//! Synthetic data is a developer-only debug mode. Studies run on synthetic
//! data are tagged as such in every exported artifact.

use chrono::{Datelike, NaiveDate};
use regimelab_core::data::{
    cache::hash_prices, ingest, CoverageResult, DataError, DataProvider, DataSource, ParquetCache,
};
use regimelab_core::domain::PricePoint;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(
        "no cached data for '{symbol}' and no network access (use --synthetic for synthetic data)"
    )]
    NoCachedDataOffline { symbol: String },

    #[error("no cached data for '{symbol}' and download failed: {reason}")]
    DownloadFailed { symbol: String, reason: String },

    #[error("cached data for '{symbol}' is unusable offline: {reason}")]
    CacheUnusable { symbol: String, reason: String },

    #[error("data error: {0}")]
    Data(#[from] DataError),
}

impl LoadError {
    pub fn symbol(&self) -> Option<&str> {
        match self {
            LoadError::NoCachedDataOffline { symbol }
            | LoadError::DownloadFailed { symbol, .. }
            | LoadError::CacheUnusable { symbol, .. } => Some(symbol),
            LoadError::Data(_) => None,
        }
    }
}

/// Options controlling how prices are loaded.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// First trading day (inclusive).
    pub start: NaiveDate,
    /// Last trading day (inclusive).
    pub end: NaiveDate,
    /// If true, never make provider requests.
    pub offline: bool,
    /// If true, generate a synthetic series when real data is unavailable.
    pub synthetic: bool,
    /// Refetch even if cached.
    pub force: bool,
}

impl LoadOptions {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            offline: false,
            synthetic: false,
            force: false,
        }
    }
}

/// A loaded price series with provenance.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub symbol: String,
    /// Validated, date-sorted adjusted closes.
    pub prices: Vec<PricePoint>,
    pub source: DataSource,
    /// BLAKE3 over symbol and prices, for fingerprinting the study.
    pub dataset_hash: String,
}

impl LoadedSeries {
    pub fn new(
        symbol: impl Into<String>,
        prices: Vec<PricePoint>,
        source: DataSource,
    ) -> Result<Self, DataError> {
        let symbol = symbol.into();
        let dataset_hash = compute_dataset_hash(&symbol, &prices)?;
        Ok(Self {
            symbol,
            prices,
            source,
            dataset_hash,
        })
    }

    pub fn is_synthetic(&self) -> bool {
        self.source == DataSource::Synthetic
    }
}

/// Load prices for one symbol from the cache, with fallback to a provider or
/// synthetic data.
pub fn load_prices(
    symbol: &str,
    cache: &ParquetCache,
    provider: Option<&dyn DataProvider>,
    opts: &LoadOptions,
) -> Result<LoadedSeries, LoadError> {
    // Step 1: cache
    let mut cache_problem: Option<String> = None;
    if !opts.force {
        match cache.covers_range(symbol, opts.start, opts.end) {
            CoverageResult::FullyCovered => {
                match cache.load_range(symbol, opts.start, opts.end) {
                    Ok(prices) => {
                        debug!(symbol, points = prices.len(), "loaded prices from cache");
                        return Ok(LoadedSeries::new(symbol, prices, DataSource::Cache)?);
                    }
                    Err(e) => {
                        warn!(symbol, error = %e, "cache read failed, falling back");
                        cache_problem = Some(e.to_string());
                    }
                }
            }
            CoverageResult::PartiallyCovered {
                cached_start,
                cached_end,
            } => {
                info!(
                    symbol,
                    %cached_start,
                    %cached_end,
                    "cache does not span the requested range"
                );
                cache_problem = Some(format!(
                    "cache covers {cached_start} to {cached_end}, requested {} to {}",
                    opts.start, opts.end
                ));
            }
            CoverageResult::NotCached => {}
        }
    }

    // Step 2: provider
    let mut failure: Option<String> = None;
    if !opts.offline {
        match provider {
            Some(prov) if prov.is_available() => match fetch_and_cache(prov, cache, symbol, opts) {
                Ok(series) => return Ok(series),
                Err(e) => {
                    warn!(symbol, provider = prov.name(), error = %e, "fetch failed");
                    failure = Some(e.to_string());
                }
            },
            Some(prov) => failure = Some(format!("provider '{}' is unavailable", prov.name())),
            None => failure = Some("no data provider configured".into()),
        }
    }

    // Step 3: synthetic
    if opts.synthetic {
        warn!(symbol, "generating synthetic data; results will be tagged as synthetic");
        let prices = generate_synthetic_prices(symbol, opts.start, opts.end);
        return Ok(LoadedSeries::new(symbol, prices, DataSource::Synthetic)?);
    }

    // Step 4: fail
    let symbol = symbol.to_string();
    match (failure, cache_problem) {
        (Some(reason), _) => Err(LoadError::DownloadFailed { symbol, reason }),
        (None, Some(reason)) => Err(LoadError::CacheUnusable { symbol, reason }),
        (None, None) => Err(LoadError::NoCachedDataOffline { symbol }),
    }
}

fn fetch_and_cache(
    provider: &dyn DataProvider,
    cache: &ParquetCache,
    symbol: &str,
    opts: &LoadOptions,
) -> Result<LoadedSeries, DataError> {
    let fetched = provider.fetch(symbol, opts.start, opts.end)?;
    let ingested = ingest(fetched.bars)?;
    cache.write(symbol, &ingested.prices, fetched.source, opts.start, opts.end)?;
    info!(
        symbol,
        provider = provider.name(),
        points = ingested.prices.len(),
        "fetched and cached prices"
    );
    LoadedSeries::new(symbol, ingested.prices, fetched.source)
}

fn compute_dataset_hash(symbol: &str, prices: &[PricePoint]) -> Result<String, DataError> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(symbol.as_bytes());
    hasher.update(hash_prices(prices)?.as_bytes());
    Ok(hasher.finalize().to_hex().to_string())
}

/// Generate a synthetic price series for testing/development.
///
/// A random walk from 100.0 over weekdays, seeded from the symbol name so the
/// same symbol always produces the same series.
fn generate_synthetic_prices(symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<PricePoint> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut prices = Vec::new();
    let mut price = 100.0_f64;
    let mut current = start;

    while current <= end {
        let weekday = current.weekday();
        if weekday != chrono::Weekday::Sat && weekday != chrono::Weekday::Sun {
            let daily_return: f64 = rng.gen_range(-0.02..0.02);
            price *= 1.0 + daily_return;
            prices.push(PricePoint::new(current, price));
        }
        current += chrono::Duration::days(1);
    }

    prices
}
