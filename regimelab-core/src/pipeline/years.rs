//! Year tagging of trade dates.

use crate::domain::PricePoint;
use crate::error::AnalysisError;
use chrono::NaiveDate;

/// Calendar year of each price point, in input order.
pub fn year_labels(prices: &[PricePoint]) -> Vec<i32> {
    prices.iter().map(PricePoint::year).collect()
}

/// Parse a trade date as written in price exports.
///
/// Accepts `YYYY-MM-DD`, optionally followed by a time part separated by a
/// space or `T` (`1920-01-02 00:00:00`, `1920-01-02T00:00:00Z`).
pub fn parse_trade_date(raw: &str) -> Result<NaiveDate, AnalysisError> {
    let trimmed = raw.trim();
    let date_part = trimmed
        .split(|c: char| c.is_whitespace() || c == 'T')
        .next()
        .unwrap_or_default();

    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| AnalysisError::format(format!("unparseable trade date '{trimmed}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn labels_follow_input_order() {
        let prices = vec![
            PricePoint::new(NaiveDate::from_ymd_opt(1999, 12, 31).unwrap(), 1.0),
            PricePoint::new(NaiveDate::from_ymd_opt(2000, 1, 3).unwrap(), 1.0),
            PricePoint::new(NaiveDate::from_ymd_opt(1999, 6, 1).unwrap(), 1.0),
        ];
        assert_eq!(year_labels(&prices), vec![1999, 2000, 1999]);
    }

    #[test]
    fn parses_plain_and_timestamped_dates() {
        let expected = NaiveDate::from_ymd_opt(1920, 1, 2).unwrap();
        assert_eq!(parse_trade_date("1920-01-02").unwrap(), expected);
        assert_eq!(parse_trade_date(" 1920-01-02 00:00:00 ").unwrap(), expected);
        assert_eq!(parse_trade_date("1920-01-02T00:00:00Z").unwrap(), expected);
    }

    #[test]
    fn malformed_date_is_format_error() {
        assert!(matches!(
            parse_trade_date("Jan 2nd"),
            Err(AnalysisError::Format(_))
        ));
        assert!(matches!(parse_trade_date(""), Err(AnalysisError::Format(_))));
    }
}
