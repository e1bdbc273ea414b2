//! Serializable study configuration.
//!
//! A study is fully described by a TOML file:
//!
//! ```toml
//! [study]
//! start = "1920-01-01"
//! end = "2024-12-31"
//! min_term_start = 1920
//! presidents = "data/presidents.csv"
//!
//! [[indices]]
//! label = "DJIA"
//! symbol = "^DJI"
//!
//! [output]
//! dir = "output"
//! charts = true
//! ```
//!
//! Every section is optional; missing values fall back to [`StudyConfig::default`].

use chrono::NaiveDate;
use regimelab_core::pipeline::MIN_TERM_START_YEAR;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading or validating a study configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("failed to parse study TOML: {0}")]
    Parse(String),

    #[error("invalid study config: {0}")]
    Invalid(String),
}

/// Complete configuration of one study run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StudyConfig {
    pub study: StudySettings,
    pub indices: Vec<IndexSpec>,
    pub output: OutputSettings,
}

/// Date range and presidency table settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StudySettings {
    /// First trading day to load (inclusive).
    pub start: NaiveDate,
    /// Last trading day to load (inclusive). `None` means today.
    pub end: Option<NaiveDate>,
    /// Terms starting before this year are ignored.
    pub min_term_start: i32,
    /// Presidency reference table (`President,Start,End,Party`).
    pub presidents: PathBuf,
}

/// One market index to study.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexSpec {
    /// Short label used in group names (`DJIA`, `S&P`).
    pub label: String,
    /// Provider symbol (`^DJI`, `^GSPC`).
    pub symbol: String,
}

impl IndexSpec {
    pub fn new(label: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            symbol: symbol.into(),
        }
    }
}

/// Where and what to write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputSettings {
    pub dir: PathBuf,
    /// Render SVG charts next to the tables.
    pub charts: bool,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            study: StudySettings::default(),
            indices: vec![IndexSpec::new("DJIA", "^DJI"), IndexSpec::new("S&P", "^GSPC")],
            output: OutputSettings::default(),
        }
    }
}

impl Default for StudySettings {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(MIN_TERM_START_YEAR, 1, 1).unwrap_or_default(),
            end: None,
            min_term_start: MIN_TERM_START_YEAR,
            presidents: PathBuf::from("data/presidents.csv"),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            charts: true,
        }
    }
}

impl StudyConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// End of the study window, resolving "open-ended" to `today`.
    pub fn end_date(&self, today: NaiveDate) -> NaiveDate {
        self.study.end.unwrap_or(today)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.indices.is_empty() {
            return Err(ConfigError::Invalid("at least one index is required".into()));
        }
        for (i, index) in self.indices.iter().enumerate() {
            if index.label.trim().is_empty() || index.symbol.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "index #{} needs both a label and a symbol",
                    i + 1
                )));
            }
            if self.indices[..i].iter().any(|other| other.label == index.label) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate index label '{}'",
                    index.label
                )));
            }
        }
        if let Some(end) = self.study.end {
            if end < self.study.start {
                return Err(ConfigError::Invalid(format!(
                    "end date {end} is before start date {}",
                    self.study.start
                )));
            }
        }
        Ok(())
    }

    /// Deterministic content hash of the config.
    ///
    /// Two runs over identical configs and identical data share a study id
    /// and therefore an output directory.
    pub fn config_hash(&self) -> String {
        // Serializing plain structs of strings, dates and numbers cannot fail.
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_studies_djia_and_sp500_from_1920() {
        let config = StudyConfig::default();
        assert_eq!(config.indices.len(), 2);
        assert_eq!(config.indices[0].symbol, "^DJI");
        assert_eq!(config.indices[1].symbol, "^GSPC");
        assert_eq!(config.study.min_term_start, 1920);
        assert_eq!(
            config.study.start,
            NaiveDate::from_ymd_opt(1920, 1, 1).unwrap()
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config = StudyConfig::from_toml(
            r#"
            [study]
            start = "1950-01-01"
            end = "1999-12-31"

            [output]
            charts = false
            "#,
        )
        .unwrap();

        assert_eq!(config.study.start, NaiveDate::from_ymd_opt(1950, 1, 1).unwrap());
        assert_eq!(config.study.end, NaiveDate::from_ymd_opt(1999, 12, 31));
        assert_eq!(config.study.min_term_start, 1920);
        assert!(!config.output.charts);
        assert_eq!(config.output.dir, PathBuf::from("output"));
        assert_eq!(config.indices.len(), 2);
    }

    #[test]
    fn custom_indices_replace_defaults() {
        let config = StudyConfig::from_toml(
            r#"
            [[indices]]
            label = "NASDAQ"
            symbol = "^IXIC"
            "#,
        )
        .unwrap();
        assert_eq!(config.indices, vec![IndexSpec::new("NASDAQ", "^IXIC")]);
    }

    #[test]
    fn rejects_inverted_range() {
        let err = StudyConfig::from_toml(
            r#"
            [study]
            start = "2000-01-01"
            end = "1990-01-01"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_duplicate_labels() {
        let mut config = StudyConfig::default();
        config.indices.push(IndexSpec::new("DJIA", "^DJT"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = StudyConfig::from_toml("[study\nstart =").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn toml_round_trip_preserves_config() {
        let mut config = StudyConfig::default();
        config.study.end = NaiveDate::from_ymd_opt(2020, 12, 31);
        let text = config.to_toml().unwrap();
        assert_eq!(StudyConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn config_hash_tracks_content() {
        let a = StudyConfig::default();
        let mut b = a.clone();
        assert_eq!(a.config_hash(), b.config_hash());
        b.study.min_term_start = 1932;
        assert_ne!(a.config_hash(), b.config_hash());
    }

    #[test]
    fn open_end_resolves_to_today() {
        let config = StudyConfig::default();
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(config.end_date(today), today);
    }
}
