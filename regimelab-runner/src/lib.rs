//! RegimeLab Runner: study orchestration, price loading, statistics, reporting.
//!
//! This crate builds on `regimelab-core` to provide:
//! - Study configuration (TOML)
//! - Price loading with cache/download/synthetic fallback
//! - Mean / median / variance per index × party group
//! - Study runner producing the four regime groups
//! - Text and Markdown reports, SVG charts, CSV/JSON artifacts

pub mod config;
pub mod data_loader;
pub mod reporting;
pub mod stats;
pub mod study;

pub use config::{ConfigError, IndexSpec, StudyConfig};
pub use data_loader::{load_prices, LoadError, LoadOptions, LoadedSeries};
pub use reporting::{export_study, ArtifactPaths, MarkdownReportGenerator, TextReportGenerator};
pub use stats::GroupStats;
pub use study::{
    analyze_series, load_study_presidents, run_study, IndexSeries, RegimeGroup, StudyError,
    StudyResult,
};
