//! Parquet cache of validated price series with Hive-style partitioning.
//!
//! Layout: `{cache_dir}/symbol={SYMBOL}/{year}.parquet` plus a `meta.json`
//! sidecar per symbol.
//!
//! - Atomic writes (write to .tmp, rename into place)
//! - A rewrite replaces the whole series; year files it no longer covers are removed
//! - Integrity validation on load (schema check, row count > 0, hash against meta)
//! - Quarantine for corrupt files (`{filename}.quarantined`); the series is then
//!   reported as unusable rather than returned with a missing year
//! - Coverage checks against the range the series was fetched for

use super::provider::{DataError, DataSource};
use crate::domain::PricePoint;
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Metadata sidecar for a cached symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMeta {
    pub symbol: String,
    /// First and last cached trading day.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Range the series was fetched for. Wider than the trading days when the
    /// index starts later or the range ends on a non-trading day.
    pub covered_start: NaiveDate,
    pub covered_end: NaiveDate,
    pub point_count: usize,
    pub data_hash: String,
    pub source: DataSource,
    pub cached_at: chrono::NaiveDateTime,
}

/// The Parquet cache.
pub struct ParquetCache {
    cache_dir: PathBuf,
}

impl ParquetCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// `{cache_dir}/symbol={SYMBOL}/`
    fn symbol_dir(&self, symbol: &str) -> PathBuf {
        self.cache_dir.join(format!("symbol={symbol}"))
    }

    fn year_path(&self, symbol: &str, year: i32) -> PathBuf {
        self.symbol_dir(symbol).join(format!("{year}.parquet"))
    }

    fn meta_path(&self, symbol: &str) -> PathBuf {
        self.symbol_dir(symbol).join("meta.json")
    }

    /// Write a validated price series fetched for `[start, end]`, one Parquet
    /// file per calendar year. Replaces whatever was cached for the symbol.
    pub fn write(
        &self,
        symbol: &str,
        prices: &[PricePoint],
        source: DataSource,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(), DataError> {
        let (first, last) = match (prices.first(), prices.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(DataError::CacheError("no prices to cache".into())),
        };

        let sym_dir = self.symbol_dir(symbol);
        fs::create_dir_all(&sym_dir)
            .map_err(|e| DataError::CacheError(format!("failed to create dir: {e}")))?;

        let mut by_year: BTreeMap<i32, Vec<&PricePoint>> = BTreeMap::new();
        for point in prices {
            by_year.entry(point.date.year()).or_default().push(point);
        }

        for (year, year_points) in &by_year {
            let df = prices_to_dataframe(year_points)?;
            let path = self.year_path(symbol, *year);
            let tmp_path = path.with_extension("parquet.tmp");

            write_parquet(&df, &tmp_path)?;

            fs::rename(&tmp_path, &path).map_err(|e| {
                let _ = fs::remove_file(&tmp_path);
                DataError::CacheError(format!("atomic rename failed: {e}"))
            })?;
        }

        self.remove_stale_years(symbol, &by_year)?;

        let meta = CacheMeta {
            symbol: symbol.to_string(),
            start_date: first.date,
            end_date: last.date,
            covered_start: start.min(first.date),
            covered_end: end.max(last.date),
            point_count: prices.len(),
            data_hash: hash_prices(prices)?,
            source,
            cached_at: chrono::Local::now().naive_local(),
        };
        let meta_json = serde_json::to_string_pretty(&meta)
            .map_err(|e| DataError::CacheError(format!("meta serialization: {e}")))?;
        fs::write(self.meta_path(symbol), meta_json)
            .map_err(|e| DataError::CacheError(format!("meta write: {e}")))?;

        debug!(symbol, years = by_year.len(), points = prices.len(), "cached price series");
        Ok(())
    }

    fn remove_stale_years(
        &self,
        symbol: &str,
        written: &BTreeMap<i32, Vec<&PricePoint>>,
    ) -> Result<(), DataError> {
        for (year, path) in self.year_files(symbol)? {
            if !written.contains_key(&year) {
                fs::remove_file(&path)
                    .map_err(|e| DataError::CacheError(format!("remove stale year {year}: {e}")))?;
                debug!(symbol, year, "removed stale cache year");
            }
        }
        Ok(())
    }

    /// `{year}.parquet` files under the symbol directory.
    fn year_files(&self, symbol: &str) -> Result<Vec<(i32, PathBuf)>, DataError> {
        let entries = fs::read_dir(self.symbol_dir(symbol))
            .map_err(|e| DataError::CacheError(format!("read dir: {e}")))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| DataError::CacheError(format!("dir entry: {e}")))?;
            let path = entry.path();
            // meta.json, .quarantined, leftover .tmp
            if path.extension().and_then(|e| e.to_str()) != Some("parquet") {
                continue;
            }
            if let Some(year) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<i32>().ok())
            {
                files.push((year, path));
            }
        }
        files.sort();
        Ok(files)
    }

    /// Load every cached price for a symbol, sorted by date ascending.
    ///
    /// Fails if any year file is corrupt (it is quarantined and the metadata
    /// dropped, so the symbol reads as uncached afterwards) or if the files
    /// no longer match the hash recorded at write time.
    pub fn load(&self, symbol: &str) -> Result<Vec<PricePoint>, DataError> {
        let no_data = || DataError::NoCachedData {
            symbol: symbol.to_string(),
        };
        if !self.symbol_dir(symbol).exists() {
            return Err(no_data());
        }
        let meta = self.get_meta(symbol).ok_or_else(no_data)?;

        let mut all_points = Vec::new();
        let mut quarantined = Vec::new();

        for (year, path) in self.year_files(symbol)? {
            match load_and_validate_parquet(&path) {
                Ok(points) => all_points.extend(points),
                Err(e) => {
                    let quarantine = path.with_extension("parquet.quarantined");
                    warn!(path = %path.display(), error = %e, "quarantining corrupt cache file");
                    let _ = fs::rename(&path, &quarantine);
                    quarantined.push(year);
                }
            }
        }

        if !quarantined.is_empty() {
            let _ = fs::remove_file(self.meta_path(symbol));
            return Err(DataError::CacheError(format!(
                "corrupt cache years {quarantined:?} for '{symbol}' were quarantined"
            )));
        }
        if all_points.is_empty() {
            return Err(no_data());
        }

        all_points.sort_by_key(|p| p.date);
        if hash_prices(&all_points)? != meta.data_hash {
            return Err(DataError::CacheError(format!(
                "cached closes for '{symbol}' do not match meta.json"
            )));
        }
        Ok(all_points)
    }

    /// Load cached prices restricted to an inclusive date range.
    pub fn load_range(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, DataError> {
        let points: Vec<PricePoint> = self
            .load(symbol)?
            .into_iter()
            .filter(|p| p.date >= start && p.date <= end)
            .collect();
        if points.is_empty() {
            return Err(DataError::NoCachedData {
                symbol: symbol.to_string(),
            });
        }
        Ok(points)
    }

    pub fn get_meta(&self, symbol: &str) -> Option<CacheMeta> {
        let content = fs::read_to_string(self.meta_path(symbol)).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Metadata of every symbol in the cache directory, sorted by symbol.
    pub fn list(&self) -> Result<Vec<CacheMeta>, DataError> {
        if !self.cache_dir.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.cache_dir)
            .map_err(|e| DataError::CacheError(format!("read dir: {e}")))?;

        let mut metas = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            if let Some(symbol) = name.strip_prefix("symbol=") {
                if let Some(meta) = self.get_meta(symbol) {
                    metas.push(meta);
                }
            }
        }
        metas.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(metas)
    }

    /// Check whether the range the symbol was fetched for spans `[start, end]`.
    pub fn covers_range(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> CoverageResult {
        match self.get_meta(symbol) {
            None => CoverageResult::NotCached,
            Some(meta) if meta.covered_start <= start && meta.covered_end >= end => {
                CoverageResult::FullyCovered
            }
            Some(meta) => CoverageResult::PartiallyCovered {
                cached_start: meta.covered_start,
                cached_end: meta.covered_end,
            },
        }
    }
}

/// How well the cache covers the requested date range.
#[derive(Debug, Clone, PartialEq)]
pub enum CoverageResult {
    NotCached,
    FullyCovered,
    PartiallyCovered {
        cached_start: NaiveDate,
        cached_end: NaiveDate,
    },
}

/// BLAKE3 over dates and prices, hex encoded.
pub fn hash_prices(prices: &[PricePoint]) -> Result<String, DataError> {
    let bytes = serde_json::to_vec(prices)
        .map_err(|e| DataError::CacheError(format!("hash serialization: {e}")))?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

// ── Parquet I/O helpers ─────────────────────────────────────────────

// NaiveDate's default is 1970-01-01, the Parquet date epoch.
fn epoch() -> NaiveDate {
    NaiveDate::default()
}

fn prices_to_dataframe(points: &[&PricePoint]) -> Result<DataFrame, DataError> {
    let dates: Vec<i32> = points
        .iter()
        .map(|p| (p.date - epoch()).num_days() as i32)
        .collect();
    let adj_closes: Vec<f64> = points.iter().map(|p| p.adj_close).collect();

    DataFrame::new(vec![
        Column::new("date".into(), dates)
            .cast(&DataType::Date)
            .map_err(|e| DataError::ParquetError(format!("date cast: {e}")))?,
        Column::new("adj_close".into(), adj_closes),
    ])
    .map_err(|e| DataError::ParquetError(format!("dataframe creation: {e}")))
}

fn write_parquet(df: &DataFrame, path: &Path) -> Result<(), DataError> {
    let file =
        fs::File::create(path).map_err(|e| DataError::ParquetError(format!("create file: {e}")))?;
    ParquetWriter::new(file)
        .finish(&mut df.clone())
        .map_err(|e| DataError::ParquetError(format!("write parquet: {e}")))?;
    Ok(())
}

fn load_and_validate_parquet(path: &Path) -> Result<Vec<PricePoint>, DataError> {
    let file = fs::File::open(path).map_err(|e| DataError::ParquetError(format!("open: {e}")))?;
    let df = ParquetReader::new(file)
        .finish()
        .map_err(|e| DataError::ParquetError(format!("read: {e}")))?;

    if df.height() == 0 {
        return Err(DataError::ValidationError("empty parquet file".into()));
    }

    for col_name in ["date", "adj_close"] {
        if df.column(col_name).is_err() {
            return Err(DataError::ValidationError(format!(
                "missing column '{col_name}'"
            )));
        }
    }

    dataframe_to_prices(&df)
}

fn dataframe_to_prices(df: &DataFrame) -> Result<Vec<PricePoint>, DataError> {
    let map_err = |e: PolarsError| DataError::ParquetError(format!("column read: {e}"));

    let date_ca = df
        .column("date")
        .map_err(map_err)?
        .date()
        .map_err(|e| DataError::ParquetError(format!("date column type: {e}")))?;
    let adj_ca = df
        .column("adj_close")
        .map_err(map_err)?
        .f64()
        .map_err(|e| DataError::ParquetError(format!("adj_close column type: {e}")))?;

    let mut points = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let days = date_ca
            .get(i)
            .ok_or_else(|| DataError::ParquetError(format!("null date at row {i}")))?;
        let adj_close = adj_ca
            .get(i)
            .ok_or_else(|| DataError::ParquetError(format!("null price at row {i}")))?;
        points.push(PricePoint::new(
            epoch() + chrono::Duration::days(days as i64),
            adj_close,
        ));
    }

    Ok(points)
}
