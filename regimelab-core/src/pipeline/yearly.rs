//! Yearly rollup of daily returns.
//!
//! The rollup is a run-length fold over the input order, not a group-by: a
//! year that reappears after a different year starts a new run and produces
//! its own entry. Price series arrive date-sorted, so in practice every year is
//! exactly one run.

use crate::domain::{TradingDay, YearlyReturn};
use crate::error::AnalysisError;

/// Sum daily returns over each contiguous run of same-year trading days.
pub fn yearly_returns(days: &[TradingDay]) -> Vec<YearlyReturn> {
    fold_runs(days.iter().map(|d| (d.year, d.daily_return)))
}

/// Same rollup over parallel year-label and daily-return sequences.
pub fn yearly_returns_from_parts(
    years: &[i32],
    returns: &[f64],
) -> Result<Vec<YearlyReturn>, AnalysisError> {
    if years.len() != returns.len() {
        return Err(AnalysisError::LengthMismatch {
            years: years.len(),
            returns: returns.len(),
        });
    }
    Ok(fold_runs(years.iter().copied().zip(returns.iter().copied())))
}

fn fold_runs(pairs: impl IntoIterator<Item = (i32, f64)>) -> Vec<YearlyReturn> {
    let mut out = Vec::new();
    let mut current: Option<YearlyReturn> = None;

    for (year, daily) in pairs {
        if let Some(run) = current.as_mut() {
            if run.year == year {
                run.returns += daily;
                continue;
            }
        }
        if let Some(closed) = current.replace(YearlyReturn {
            year,
            returns: daily,
        }) {
            out.push(closed);
        }
    }

    // The last run has no boundary after it; flush it explicitly.
    out.extend(current);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn sorted_years_give_one_entry_per_year() {
        let out = yearly_returns_from_parts(&[1920, 1920, 1921], &[0.0, 0.01, 0.02]).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].year, 1920);
        assert_close(out[0].returns, 0.01);
        assert_eq!(out[1].year, 1921);
        assert_close(out[1].returns, 0.02);
    }

    #[test]
    fn final_run_is_flushed() {
        // The original rollup never emitted the last year; this one does.
        let out = yearly_returns_from_parts(&[2023, 2024, 2024], &[0.0, 0.5, 0.25]).unwrap();
        assert_eq!(out.last().map(|y| y.year), Some(2024));
        assert_close(out[1].returns, 0.75);
    }

    #[test]
    fn non_contiguous_repeat_starts_a_new_run() {
        let out = yearly_returns_from_parts(&[1920, 1921, 1920], &[0.1, 0.2, 0.3]).unwrap();
        let years: Vec<i32> = out.iter().map(|y| y.year).collect();
        assert_eq!(years, vec![1920, 1921, 1920]);
        assert_close(out[0].returns, 0.1);
        assert_close(out[2].returns, 0.3);
    }

    #[test]
    fn empty_input_gives_no_years() {
        assert!(yearly_returns(&[]).is_empty());
        assert!(yearly_returns_from_parts(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = yearly_returns_from_parts(&[1920, 1921], &[0.0]).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::LengthMismatch {
                years: 2,
                returns: 1
            }
        );
    }
}
