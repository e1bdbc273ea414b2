//! Markdown report generator.

use crate::reporting::format_value;
use crate::study::StudyResult;

pub struct MarkdownReportGenerator;

impl MarkdownReportGenerator {
    pub fn generate(&self, result: &StudyResult) -> String {
        let mut report = format!(
            "# RegimeLab Study Report\n\n\
Study ID: `{}`\n\n\
- Terms starting in or after {}\n\
- Presidency table: `{}`\n",
            result.study_id,
            result.config.study.min_term_start,
            result.config.study.presidents.display(),
        );

        if result.has_synthetic {
            report.push_str("- **SYNTHETIC DATA**: at least one index used generated prices\n");
        }

        // Data provenance
        report.push_str("\n## Indices\n\n");
        report.push_str("| Index | Symbol | Source | Trading days | First | Last | Years |\n");
        report.push_str("|-------|--------|--------|--------------|-------|------|-------|\n");
        for index in &result.indices {
            report.push_str(&format!(
                "| {} | {} | {:?} | {} | {} | {} | {} |\n",
                index.label,
                index.symbol,
                index.source,
                index.trading_days,
                index.first_date.map(|d| d.to_string()).unwrap_or_default(),
                index.last_date.map(|d| d.to_string()).unwrap_or_default(),
                index.yearly.len(),
            ));
        }

        // Central tendency comparison
        report.push_str("\n## Comparison\n\n");
        report.push_str("| Group | Years | Mean | Median | Variance | Pop. variance |\n");
        report.push_str("|-------|-------|------|--------|----------|---------------|\n");
        for group in &result.groups {
            report.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                group.key,
                group.stats.count,
                format_value(group.stats.mean, 4),
                format_value(group.stats.median, 4),
                format_value(group.stats.variance, 4),
                format_value(group.stats.population_variance, 4),
            ));
        }

        // Yearly returns by group
        let table = result.combined_yearly();
        if !table.rows.is_empty() {
            report.push_str("\n## Yearly Returns\n\n");
            report.push_str("| Year |");
            for column in &table.columns {
                report.push_str(&format!(" {column} |"));
            }
            report.push_str("\n|------|");
            for _ in &table.columns {
                report.push_str("------|");
            }
            report.push('\n');
            for row in &table.rows {
                report.push_str(&format!("| {} |", row.year));
                for value in &row.values {
                    let cell = value.map(|v| format!("{:+.2}%", v * 100.0)).unwrap_or_default();
                    report.push_str(&format!(" {cell} |"));
                }
                report.push('\n');
            }
        }

        report.push_str(
            "\n## Notes\n\
- Yearly return is the sum of daily returns within a calendar year (not compounded).\n\
- Terms are half-open year ranges: the end year belongs to the successor.\n\
- Variance is the sample variance (n - 1).\n",
        );

        report
    }
}
