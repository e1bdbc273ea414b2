//! CSV import provider for Yahoo-style price exports.
//!
//! Reads `{dir}/{symbol}.csv` with a leading `^` dropped from the symbol, so
//! `^GSPC` maps to `GSPC.csv`. Expected columns are `Date` and `Adj Close`
//! and/or `Close`; anything else in the file is ignored. Blank or `null`
//! prices become NaN and are dropped later by ingest.

use super::provider::{DataError, DataProvider, DataSource, FetchResult, RawBar};
use crate::pipeline::parse_trade_date;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date", alias = "date")]
    date: String,
    #[serde(rename = "Close", alias = "close", default)]
    close: Option<String>,
    #[serde(rename = "Adj Close", alias = "adj_close", default)]
    adj_close: Option<String>,
}

fn parse_price(raw: Option<&str>) -> Result<f64, DataError> {
    match raw.map(str::trim) {
        None | Some("") | Some("null") | Some("NaN") => Ok(f64::NAN),
        Some(s) => s
            .parse::<f64>()
            .map_err(|e| DataError::ImportError(format!("bad price '{s}': {e}"))),
    }
}

/// Reads price series from a directory of CSV exports.
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the export for a symbol.
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir
            .join(format!("{}.csv", symbol.trim_start_matches('^')))
    }

    /// Parse one CSV export into raw bars, keeping rows inside `[start, end]`.
    pub fn read_file(
        path: &Path,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>, DataError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| DataError::ImportError(format!("{}: {e}", path.display())))?;

        let mut bars = Vec::new();
        for (line, row) in rdr.deserialize::<CsvRow>().enumerate() {
            let row = row.map_err(|e| DataError::ImportError(format!("row {}: {e}", line + 2)))?;
            let date = parse_trade_date(&row.date)
                .map_err(|e| DataError::ImportError(format!("row {}: {e}", line + 2)))?;
            if date < start || date > end {
                continue;
            }
            bars.push(RawBar {
                date,
                close: parse_price(row.close.as_deref())?,
                adj_close: parse_price(row.adj_close.as_deref())?,
            });
        }
        Ok(bars)
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv_import"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        let bars = Self::read_file(&path, start, end)?;
        if bars.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::CsvImport,
        })
    }

    fn is_available(&self) -> bool {
        self.dir.is_dir()
    }
}
