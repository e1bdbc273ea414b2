//! Study runner: wires together price loading, the return pipeline, and stats.
//!
//! Two entry points:
//! - `run_study()`: loads every configured index through the cache/provider
//!   fallback, then analyzes. Used by the CLI.
//! - `analyze_series()`: takes pre-loaded series. Used by tests and callers
//!   that bring their own prices.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use regimelab_core::data::{load_presidents, DataError, DataProvider, DataSource, ParquetCache};
use regimelab_core::domain::{Party, PartyTerm, PartitionedReturn, PresidencyRecord, YearlyReturn};
use regimelab_core::pipeline::{partition_by_presidency, presidency_table_since, yearly_series};
use regimelab_core::AnalysisError;

use crate::config::{ConfigError, IndexSpec, StudyConfig};
use crate::data_loader::{load_prices, LoadOptions, LoadedSeries};
use crate::stats::GroupStats;

/// Errors from the study runner.
#[derive(Debug, Error)]
pub enum StudyError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error("presidency table: {0}")]
    Presidents(#[from] DataError),
    #[error("expected {expected} price series (one per index), got {got}")]
    SeriesMismatch { expected: usize, got: usize },
}

/// Current schema version for exported summaries.
pub const SCHEMA_VERSION: u32 = 1;

/// Party order of the report groups: Democratic first, then Republican.
pub const GROUP_PARTY_ORDER: [Party; 2] = [Party::Democratic, Party::Republican];

/// Yearly returns of one index plus where its prices came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSeries {
    pub label: String,
    pub symbol: String,
    pub source: DataSource,
    pub dataset_hash: String,
    pub trading_days: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub yearly: Vec<YearlyReturn>,
}

/// One index × party group of partitioned yearly returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeGroup {
    /// Column key such as `DJIA_DEM`.
    pub key: String,
    pub index_label: String,
    pub symbol: String,
    pub party: Party,
    pub returns: Vec<PartitionedReturn>,
    pub stats: GroupStats,
}

impl RegimeGroup {
    fn build(index: &IndexSeries, party: Party, terms: &[PartyTerm]) -> Self {
        let party_terms: Vec<PartyTerm> =
            terms.iter().filter(|t| t.party == party).copied().collect();
        let returns = partition_by_presidency(&index.yearly, &party_terms);
        let values: Vec<f64> = returns.iter().map(|r| r.returns).collect();
        Self {
            key: group_key(&index.label, party),
            index_label: index.label.clone(),
            symbol: index.symbol.clone(),
            party,
            stats: GroupStats::compute(&values),
            returns,
        }
    }

    /// Heading used in reports: `DJIA during Democratic terms`.
    pub fn title(&self) -> String {
        format!("{} during {} terms", self.index_label, self.party)
    }
}

pub fn group_key(index_label: &str, party: Party) -> String {
    format!("{index_label}_{}", party.tag())
}

/// Complete result of one study run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyResult {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Content hash over the config and every dataset hash.
    pub study_id: String,
    pub config: StudyConfig,
    pub indices: Vec<IndexSeries>,
    /// Terms of both parties that passed the start-year filter.
    pub terms: Vec<PartyTerm>,
    /// Groups ordered party-major (Democratic, Republican), index-minor.
    pub groups: Vec<RegimeGroup>,
    pub has_synthetic: bool,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Yearly returns of every group side by side, one row per year.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedTable {
    pub columns: Vec<String>,
    pub rows: Vec<CombinedRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CombinedRow {
    pub year: i32,
    /// One cell per column; `None` where the group has no return that year.
    pub values: Vec<Option<f64>>,
}

impl StudyResult {
    pub fn group(&self, key: &str) -> Option<&RegimeGroup> {
        self.groups.iter().find(|g| g.key == key)
    }

    /// Join every group's returns on year.
    ///
    /// A year repeated inside one group (overlapping terms) keeps its first
    /// occurrence.
    pub fn combined_yearly(&self) -> CombinedTable {
        let columns: Vec<String> = self.groups.iter().map(|g| g.key.clone()).collect();
        let mut by_year: BTreeMap<i32, Vec<Option<f64>>> = BTreeMap::new();

        for (col, group) in self.groups.iter().enumerate() {
            for r in &group.returns {
                let cells = by_year
                    .entry(r.year)
                    .or_insert_with(|| vec![None; columns.len()]);
                if cells[col].is_none() {
                    cells[col] = Some(r.returns);
                }
            }
        }

        CombinedTable {
            columns,
            rows: by_year
                .into_iter()
                .map(|(year, values)| CombinedRow { year, values })
                .collect(),
        }
    }
}

/// Read the presidency table named by the config.
pub fn load_study_presidents(config: &StudyConfig) -> Result<Vec<PresidencyRecord>, StudyError> {
    Ok(load_presidents(&config.study.presidents)?)
}

/// Load every configured index, then analyze.
pub fn run_study(
    config: &StudyConfig,
    records: &[PresidencyRecord],
    cache: &ParquetCache,
    provider: Option<&dyn DataProvider>,
    opts: &LoadOptions,
) -> Result<StudyResult, StudyError> {
    config.validate()?;

    let mut loaded = Vec::with_capacity(config.indices.len());
    for spec in &config.indices {
        let series = load_prices(&spec.symbol, cache, provider, opts)
            .map_err(|e| AnalysisError::unavailable(&spec.symbol, e))?;
        info!(
            index = %spec.label,
            symbol = %spec.symbol,
            source = ?series.source,
            points = series.prices.len(),
            "loaded index"
        );
        loaded.push(series);
    }

    analyze_series(config, records, &loaded)
}

/// Run the pipeline over pre-loaded series, one per configured index in order.
pub fn analyze_series(
    config: &StudyConfig,
    records: &[PresidencyRecord],
    loaded: &[LoadedSeries],
) -> Result<StudyResult, StudyError> {
    if loaded.len() != config.indices.len() {
        return Err(StudyError::SeriesMismatch {
            expected: config.indices.len(),
            got: loaded.len(),
        });
    }

    let indices = config
        .indices
        .iter()
        .zip(loaded)
        .map(|(spec, series)| index_series(spec, series))
        .collect::<Result<Vec<_>, _>>()?;

    let mut terms = Vec::new();
    for party in GROUP_PARTY_ORDER {
        terms.extend(presidency_table_since(records, party, config.study.min_term_start)?);
    }

    let mut groups = Vec::with_capacity(GROUP_PARTY_ORDER.len() * indices.len());
    for party in GROUP_PARTY_ORDER {
        for index in &indices {
            let group = RegimeGroup::build(index, party, &terms);
            info!(
                group = %group.key,
                years = group.stats.count,
                mean = ?group.stats.mean,
                "partitioned returns"
            );
            groups.push(group);
        }
    }

    let has_synthetic = loaded.iter().any(LoadedSeries::is_synthetic);
    let study_id = study_id(config, &indices);

    Ok(StudyResult {
        schema_version: SCHEMA_VERSION,
        study_id,
        config: config.clone(),
        indices,
        terms,
        groups,
        has_synthetic,
    })
}

fn index_series(spec: &IndexSpec, series: &LoadedSeries) -> Result<IndexSeries, AnalysisError> {
    let yearly = yearly_series(&series.prices)?;
    Ok(IndexSeries {
        label: spec.label.clone(),
        symbol: spec.symbol.clone(),
        source: series.source,
        dataset_hash: series.dataset_hash.clone(),
        trading_days: series.prices.len(),
        first_date: series.prices.first().map(|p| p.date),
        last_date: series.prices.last().map(|p| p.date),
        yearly,
    })
}

fn study_id(config: &StudyConfig, indices: &[IndexSeries]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(config.config_hash().as_bytes());
    for index in indices {
        hasher.update(index.dataset_hash.as_bytes());
    }
    hasher.finalize().to_hex().as_str()[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use regimelab_core::domain::PricePoint;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// Two prices per year: the yearly return is `(close - open) / open`.
    fn series(symbol: &str, years: &[(i32, f64, f64)]) -> LoadedSeries {
        let mut prices = Vec::new();
        for &(year, open, close) in years {
            prices.push(PricePoint::new(d(year, 1, 3), open));
            prices.push(PricePoint::new(d(year, 12, 30), close));
        }
        LoadedSeries::new(symbol, prices, DataSource::Cache).unwrap()
    }

    fn records() -> Vec<PresidencyRecord> {
        vec![
            PresidencyRecord::new("March 4 1913", "March 4 1921", "Democratic"),
            PresidencyRecord::new("March 4 1921", "March 4 1933", "Republican"),
            PresidencyRecord::new("March 4 1933", "April 12 1945", "Democratic"),
        ]
    }

    #[test]
    fn groups_come_out_party_major() {
        let config = StudyConfig::default();
        let loaded = vec![
            series("^DJI", &[(1929, 100.0, 80.0), (1934, 100.0, 105.0)]),
            series("^GSPC", &[(1929, 50.0, 40.0), (1934, 50.0, 55.0)]),
        ];

        let result = analyze_series(&config, &records(), &loaded).unwrap();

        let keys: Vec<&str> = result.groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["DJIA_DEM", "S&P_DEM", "DJIA_REP", "S&P_REP"]);
        assert!(!result.has_synthetic);
        assert_eq!(result.study_id.len(), 16);
    }

    #[test]
    fn returns_land_in_the_governing_party() {
        let config = StudyConfig::default();
        let loaded = vec![
            series("^DJI", &[(1929, 100.0, 80.0), (1934, 100.0, 105.0)]),
            series("^GSPC", &[(1929, 50.0, 40.0), (1934, 50.0, 55.0)]),
        ];
        let result = analyze_series(&config, &records(), &loaded).unwrap();

        // Daily returns: 1929 has a sentinel day plus one -20% move.
        let djia_rep = result.group("DJIA_REP").unwrap();
        assert_eq!(djia_rep.returns.len(), 1);
        assert_eq!(djia_rep.returns[0].year, 1929);
        assert!((djia_rep.returns[0].returns + 0.2).abs() < 1e-12);

        // 1934 opens with the jump from the 1929 close (80 → 100), then +5%.
        let djia_dem = result.group("DJIA_DEM").unwrap();
        assert_eq!(djia_dem.returns.len(), 1);
        assert_eq!(djia_dem.returns[0].year, 1934);
        assert!((djia_dem.returns[0].returns - 0.30).abs() < 1e-12);
        assert_eq!(djia_dem.stats.count, 1);
        assert_eq!(djia_dem.stats.variance, None);
    }

    #[test]
    fn pre_1920_terms_are_ignored() {
        let config = StudyConfig::default();
        let loaded = vec![
            series("^DJI", &[(1915, 100.0, 110.0)]),
            series("^GSPC", &[(1915, 100.0, 110.0)]),
        ];
        let result = analyze_series(&config, &records(), &loaded).unwrap();

        assert!(result.terms.iter().all(|t| t.start >= 1920));
        assert!(result.groups.iter().all(|g| g.returns.is_empty()));
        assert!(result.groups.iter().all(|g| g.stats.mean.is_none()));
    }

    #[test]
    fn lower_min_start_includes_earlier_terms() {
        let mut config = StudyConfig::default();
        config.study.min_term_start = 1900;
        let loaded = vec![
            series("^DJI", &[(1915, 100.0, 110.0)]),
            series("^GSPC", &[(1915, 100.0, 110.0)]),
        ];
        let result = analyze_series(&config, &records(), &loaded).unwrap();
        assert_eq!(result.group("DJIA_DEM").unwrap().returns.len(), 1);
    }

    #[test]
    fn series_count_must_match_indices() {
        let config = StudyConfig::default();
        let loaded = vec![series("^DJI", &[(1930, 1.0, 2.0)])];
        let err = analyze_series(&config, &records(), &loaded).unwrap_err();
        assert!(matches!(
            err,
            StudyError::SeriesMismatch {
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn malformed_term_date_fails_the_study() {
        let config = StudyConfig::default();
        let loaded = vec![
            series("^DJI", &[(1930, 1.0, 2.0)]),
            series("^GSPC", &[(1930, 1.0, 2.0)]),
        ];
        let bad = vec![PresidencyRecord::new("1921", "March 4 1933", "Republican")];
        let err = analyze_series(&config, &bad, &loaded).unwrap_err();
        assert!(matches!(err, StudyError::Analysis(AnalysisError::Format(_))));
    }

    #[test]
    fn combined_table_joins_groups_on_year() {
        let config = StudyConfig::default();
        let loaded = vec![
            series("^DJI", &[(1929, 100.0, 80.0), (1934, 100.0, 105.0)]),
            series("^GSPC", &[(1934, 50.0, 55.0)]),
        ];
        let result = analyze_series(&config, &records(), &loaded).unwrap();
        let table = result.combined_yearly();

        assert_eq!(table.columns, vec!["DJIA_DEM", "S&P_DEM", "DJIA_REP", "S&P_REP"]);
        let years: Vec<i32> = table.rows.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![1929, 1934]);

        let row_1929 = &table.rows[0];
        assert_eq!(row_1929.values[0], None);
        assert!(row_1929.values[2].is_some());
        assert_eq!(row_1929.values[3], None);

        let row_1934 = &table.rows[1];
        assert!(row_1934.values[0].is_some());
        assert!(row_1934.values[1].is_some());
        assert_eq!(row_1934.values[2], None);
    }
}
