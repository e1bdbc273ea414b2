//! Ingest: raw provider bars → validated, date-sorted price points.
//!
//! The return pipeline assumes a strictly increasing date sequence with
//! positive prices. Ingest is where that is enforced, so a zero close never
//! reaches the daily-return division.

use super::provider::{DataError, RawBar};
use crate::domain::PricePoint;
use tracing::warn;

/// Validated prices plus what ingest had to throw away.
#[derive(Debug, Clone)]
pub struct IngestResult {
    pub prices: Vec<PricePoint>,
    /// Rows with neither a close nor an adjusted close.
    pub void_rows: usize,
    /// Rows whose date was already seen (first occurrence kept).
    pub duplicate_rows: usize,
}

/// Sort, de-duplicate, and validate raw bars.
///
/// Rows without any usable price are dropped and counted. A price that is
/// present but zero, negative, or infinite is a hard validation error.
pub fn ingest(mut bars: Vec<RawBar>) -> Result<IngestResult, DataError> {
    bars.sort_by_key(|b| b.date);

    let mut prices: Vec<PricePoint> = Vec::with_capacity(bars.len());
    let mut void_rows = 0;
    let mut duplicate_rows = 0;

    for bar in bars {
        let price = bar.best_close();
        if price.is_nan() {
            void_rows += 1;
            continue;
        }
        if prices.last().is_some_and(|p| p.date == bar.date) {
            duplicate_rows += 1;
            continue;
        }

        let point = PricePoint::new(bar.date, price);
        if !point.is_valid() {
            return Err(DataError::ValidationError(format!(
                "non-positive or non-finite price {price} on {}",
                bar.date
            )));
        }
        prices.push(point);
    }

    if prices.is_empty() {
        return Err(DataError::ValidationError("no usable prices".into()));
    }

    if void_rows > 0 || duplicate_rows > 0 {
        warn!(void_rows, duplicate_rows, kept = prices.len(), "dropped rows during ingest");
    }

    Ok(IngestResult {
        prices,
        void_rows,
        duplicate_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(day: u32, close: f64, adj_close: f64) -> RawBar {
        RawBar {
            date: NaiveDate::from_ymd_opt(1987, 10, day).unwrap(),
            close,
            adj_close,
        }
    }

    #[test]
    fn sorts_by_date() {
        let out = ingest(vec![bar(20, 236.8, 236.8), bar(19, 224.8, 224.8)]).unwrap();
        assert_eq!(out.prices[0].date.format("%d").to_string(), "19");
        assert_eq!(out.prices[1].adj_close, 236.8);
    }

    #[test]
    fn drops_void_rows_and_duplicates() {
        let out = ingest(vec![
            bar(16, 282.7, 282.7),
            bar(19, f64::NAN, f64::NAN),
            bar(20, 236.8, 236.8),
            bar(20, 999.0, 999.0),
        ])
        .unwrap();
        assert_eq!(out.prices.len(), 2);
        assert_eq!(out.void_rows, 1);
        assert_eq!(out.duplicate_rows, 1);
        assert_eq!(out.prices[1].adj_close, 236.8);
    }

    #[test]
    fn falls_back_to_close_when_adjusted_missing() {
        let out = ingest(vec![bar(19, 224.8, f64::NAN)]).unwrap();
        assert_eq!(out.prices[0].adj_close, 224.8);
    }

    #[test]
    fn zero_price_is_rejected() {
        let err = ingest(vec![bar(19, 224.8, 224.8), bar(20, 0.0, 0.0)]).unwrap_err();
        assert!(matches!(err, DataError::ValidationError(_)));
    }

    #[test]
    fn nothing_usable_is_an_error() {
        assert!(ingest(vec![]).is_err());
        assert!(ingest(vec![bar(19, f64::NAN, f64::NAN)]).is_err());
    }
}
