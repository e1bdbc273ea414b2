//! Reporting and artifact export pipeline.

pub mod artifacts;
pub mod charts;
pub mod export;
pub mod reports;

pub use artifacts::{ArtifactManager, ArtifactPaths};
pub use export::export_study;
pub use reports::{MarkdownReportGenerator, TextReportGenerator};

/// Render an optional statistic, `n/a` when undefined.
pub fn format_value(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{v:.precision$}"),
        None => "n/a".to_string(),
    }
}
