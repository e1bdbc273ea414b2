//! Daily fractional returns.

use crate::error::AnalysisError;

/// Fractional day-over-day change of a price sequence.
///
/// The output has the same length as the input. Entry 0 is a `0.0` sentinel
/// (there is no prior price), which keeps position `i` of the output aligned
/// with position `i` of the prices. An empty input yields an empty output.
///
/// Fails with [`AnalysisError::DivisionByZero`] if any price other than the
/// last is zero; callers are expected to have rejected non-positive prices at
/// ingest.
pub fn daily_returns(prices: &[f64]) -> Result<Vec<f64>, AnalysisError> {
    let mut returns = Vec::with_capacity(prices.len());
    if prices.is_empty() {
        return Ok(returns);
    }

    returns.push(0.0);
    for (i, pair) in prices.windows(2).enumerate() {
        let (prev, curr) = (pair[0], pair[1]);
        if prev == 0.0 {
            return Err(AnalysisError::DivisionByZero { index: i + 1 });
        }
        returns.push((curr - prev) / prev);
    }

    Ok(returns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn empty_prices_give_empty_returns() {
        assert!(daily_returns(&[]).unwrap().is_empty());
    }

    #[test]
    fn single_price_gives_only_sentinel() {
        assert_eq!(daily_returns(&[42.0]).unwrap(), vec![0.0]);
    }

    #[test]
    fn returns_are_relative_to_previous_day() {
        let r = daily_returns(&[100.0, 110.0, 99.0]).unwrap();
        assert_eq!(r.len(), 3);
        assert_eq!(r[0], 0.0);
        assert_close(r[1], 0.10);
        assert_close(r[2], -0.10);
    }

    #[test]
    fn zero_prior_price_is_division_by_zero() {
        let err = daily_returns(&[100.0, 0.0, 5.0]).unwrap_err();
        assert_eq!(err, AnalysisError::DivisionByZero { index: 2 });
    }

    #[test]
    fn trailing_zero_is_a_valid_total_loss() {
        let r = daily_returns(&[50.0, 0.0]).unwrap();
        assert_close(r[1], -1.0);
    }

    #[test]
    fn repeated_calls_do_not_share_state() {
        let first = daily_returns(&[1.0, 2.0, 4.0]).unwrap();
        let second = daily_returns(&[10.0, 5.0]).unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(second.len(), 2);
        assert_close(second[1], -0.5);
    }
}
