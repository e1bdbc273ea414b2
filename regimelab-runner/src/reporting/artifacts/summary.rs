//! Study summary export (JSON).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::study::StudyResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudySummary {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(flatten)]
    pub result: StudyResult,
}

pub fn write_summary(path: &Path, result: &StudyResult) -> Result<()> {
    let summary = StudySummary {
        timestamp: chrono::Utc::now(),
        result: result.clone(),
    };

    let json =
        serde_json::to_string_pretty(&summary).context("Failed to serialize study summary")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write summary to {}", path.display()))?;
    Ok(())
}
