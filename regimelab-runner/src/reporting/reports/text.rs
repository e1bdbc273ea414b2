//! Plain-text report for the terminal.

use crate::reporting::format_value;
use crate::study::{RegimeGroup, StudyResult};

const RULE: &str = "=============================";

pub struct TextReportGenerator;

impl TextReportGenerator {
    pub fn generate(&self, result: &StudyResult) -> String {
        let mut out = String::new();

        if result.has_synthetic {
            out.push_str("WARNING: study ran on synthetic data; numbers are not market returns\n\n");
        }

        for group in &result.groups {
            out.push_str(&group_section(group));
            out.push('\n');
        }

        out.push_str(&self.comparison_table(result));
        out
    }

    /// Groups as rows, mean/median/variance as columns.
    pub fn comparison_table(&self, result: &StudyResult) -> String {
        let width = result
            .groups
            .iter()
            .map(|g| g.key.len())
            .max()
            .unwrap_or(0)
            .max("group".len());

        let mut out = format!(
            "{:<width$}  {:>10}  {:>10}  {:>10}\n",
            "group", "mean", "median", "variance"
        );
        for group in &result.groups {
            out.push_str(&format!(
                "{:<width$}  {:>10}  {:>10}  {:>10}\n",
                group.key,
                format_value(group.stats.mean, 4),
                format_value(group.stats.median, 4),
                format_value(group.stats.variance, 4),
            ));
        }
        out
    }
}

fn group_section(group: &RegimeGroup) -> String {
    let mut out = format!("{}\n{RULE}\n", group.title());
    out.push_str(&format!("{:>6}  {:>10}\n", "year", "returns"));
    for r in &group.returns {
        out.push_str(&format!("{:>6}  {:>10.4}\n", r.year, r.returns));
    }
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!("Mean:     {}\n", format_value(group.stats.mean, 4)));
    out.push_str(&format!("Median:   {}\n", format_value(group.stats.median, 4)));
    out.push_str(&format!("Variance: {}\n", format_value(group.stats.variance, 4)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StudyConfig;
    use crate::stats::GroupStats;
    use regimelab_core::domain::{Party, PartitionedReturn};

    fn result(groups: Vec<RegimeGroup>, has_synthetic: bool) -> StudyResult {
        StudyResult {
            schema_version: 1,
            study_id: "abc".into(),
            config: StudyConfig::default(),
            indices: Vec::new(),
            terms: Vec::new(),
            groups,
            has_synthetic,
        }
    }

    fn group(key: &str, party: Party, returns: &[(i32, f64)]) -> RegimeGroup {
        let returns: Vec<PartitionedReturn> = returns
            .iter()
            .map(|&(year, returns)| PartitionedReturn { year, returns })
            .collect();
        let values: Vec<f64> = returns.iter().map(|r| r.returns).collect();
        RegimeGroup {
            key: key.into(),
            index_label: key.split('_').next().unwrap_or_default().into(),
            symbol: "^DJI".into(),
            party,
            stats: GroupStats::compute(&values),
            returns,
        }
    }

    #[test]
    fn sections_list_years_and_stats() {
        let r = result(
            vec![group("DJIA_DEM", Party::Democratic, &[(1934, 0.1), (1935, 0.3)])],
            false,
        );
        let text = TextReportGenerator.generate(&r);

        assert!(text.contains("DJIA during Democratic terms"));
        assert!(text.contains("  1934      0.1000"));
        assert!(text.contains("Mean:     0.2000"));
        assert!(text.contains("Median:   0.2000"));
        assert!(text.contains("Variance: 0.0200"));
        assert!(!text.contains("WARNING"));
    }

    #[test]
    fn comparison_has_one_row_per_group() {
        let r = result(
            vec![
                group("DJIA_DEM", Party::Democratic, &[(1934, 0.1)]),
                group("S&P_REP", Party::Republican, &[]),
            ],
            false,
        );
        let table = TextReportGenerator.comparison_table(&r);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("group"));
        assert!(lines[1].starts_with("DJIA_DEM"));
        // Single observation: no sample variance.
        assert!(lines[1].trim_end().ends_with("n/a"));
        assert!(lines[2].starts_with("S&P_REP"));
        assert_eq!(lines[2].matches("n/a").count(), 3);
    }

    #[test]
    fn synthetic_studies_are_flagged() {
        let r = result(Vec::new(), true);
        assert!(TextReportGenerator.generate(&r).starts_with("WARNING"));
    }
}
