//! Return tables (CSV).

use anyhow::{Context, Result};
use std::path::Path;

use crate::study::StudyResult;

/// Long format: one row per (group, year) in group order.
pub fn write_partitioned_csv(path: &Path, result: &StudyResult) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create partitioned CSV {}", path.display()))?;

    wtr.write_record(["group", "index", "symbol", "party", "year", "returns"])?;
    for group in &result.groups {
        for r in &group.returns {
            wtr.write_record([
                group.key.clone(),
                group.index_label.clone(),
                group.symbol.clone(),
                group.party.name().to_string(),
                r.year.to_string(),
                format!("{:.6}", r.returns),
            ])?;
        }
    }
    wtr.flush().context("Failed to flush partitioned CSV")?;
    Ok(())
}

/// Wide format: one row per year, one column per group, blank where absent.
pub fn write_yearly_csv(path: &Path, result: &StudyResult) -> Result<()> {
    let table = result.combined_yearly();
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create yearly CSV {}", path.display()))?;

    let mut header = vec!["year".to_string()];
    header.extend(table.columns.iter().cloned());
    wtr.write_record(&header)?;

    for row in &table.rows {
        let mut record = vec![row.year.to_string()];
        record.extend(
            row.values
                .iter()
                .map(|v| v.map(|v| format!("{v:.6}")).unwrap_or_default()),
        );
        wtr.write_record(&record)?;
    }
    wtr.flush().context("Failed to flush yearly CSV")?;
    Ok(())
}
