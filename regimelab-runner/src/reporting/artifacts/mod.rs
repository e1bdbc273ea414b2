//! Artifact manager for persisting study outputs.

mod summary;
mod tables;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::study::StudyResult;

pub use summary::StudySummary;

/// Artifact paths returned after export.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub run_dir: PathBuf,
    pub summary_json: PathBuf,
    pub partitioned_csv: PathBuf,
    pub yearly_csv: PathBuf,
    pub report_markdown: Option<PathBuf>,
    pub comparison_svg: Option<PathBuf>,
    pub yearly_svg: Option<PathBuf>,
}

/// Manages writing all artifacts for a study.
#[derive(Debug, Clone)]
pub struct ArtifactManager {
    output_dir: PathBuf,
}

impl ArtifactManager {
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir)
            .context("Failed to create artifact output directory")?;
        Ok(Self { output_dir })
    }

    /// Save the data artifacts (summary and tables) under `{output_dir}/{study_id}/`.
    pub fn save_study(&self, result: &StudyResult) -> Result<ArtifactPaths> {
        let run_dir = self.output_dir.join(&result.study_id);
        std::fs::create_dir_all(&run_dir)
            .context("Failed to create study artifact directory")?;

        let summary_json = run_dir.join("summary.json");
        summary::write_summary(&summary_json, result)?;

        let partitioned_csv = run_dir.join("partitioned_returns.csv");
        tables::write_partitioned_csv(&partitioned_csv, result)?;

        let yearly_csv = run_dir.join("yearly_returns.csv");
        tables::write_yearly_csv(&yearly_csv, result)?;

        Ok(ArtifactPaths {
            run_dir,
            summary_json,
            partitioned_csv,
            yearly_csv,
            report_markdown: None,
            comparison_svg: None,
            yearly_svg: None,
        })
    }
}
