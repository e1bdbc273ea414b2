//! Export orchestrator for artifacts, reports, and charts.

use anyhow::{Context, Result};
use std::path::Path;

use crate::reporting::artifacts::{ArtifactManager, ArtifactPaths};
use crate::reporting::charts::{comparison_chart, yearly_returns_chart};
use crate::reporting::reports::MarkdownReportGenerator;
use crate::study::StudyResult;

/// Write every artifact of a study; charts only when `include_charts` is set.
pub fn export_study(
    output_dir: impl AsRef<Path>,
    result: &StudyResult,
    include_charts: bool,
) -> Result<ArtifactPaths> {
    let manager = ArtifactManager::new(output_dir)?;
    let mut paths = manager.save_study(result)?;

    let report_path = paths.run_dir.join("report.md");
    let report = MarkdownReportGenerator.generate(result);
    std::fs::write(&report_path, report)
        .with_context(|| format!("Failed to write report to {}", report_path.display()))?;
    paths.report_markdown = Some(report_path);

    if include_charts {
        let comparison = paths.run_dir.join("comparison.svg");
        std::fs::write(&comparison, comparison_chart(result))
            .with_context(|| format!("Failed to write chart {}", comparison.display()))?;
        paths.comparison_svg = Some(comparison);

        let yearly = paths.run_dir.join("yearly_returns.svg");
        std::fs::write(&yearly, yearly_returns_chart(result))
            .with_context(|| format!("Failed to write chart {}", yearly.display()))?;
        paths.yearly_svg = Some(yearly);
    }

    tracing::info!(dir = %paths.run_dir.display(), charts = include_charts, "exported study");
    Ok(paths)
}
