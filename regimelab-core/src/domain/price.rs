//! Price points and the per-day records derived from them.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Adjusted close of an index on a single trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub adj_close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, adj_close: f64) -> Self {
        Self { date, adj_close }
    }

    /// Calendar year of the trade date.
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// A usable price is finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.adj_close.is_finite() && self.adj_close > 0.0
    }
}

/// One trading day with everything the yearly rollup needs.
///
/// Replaces the lockstep price / return / year columns: a record can't drift
/// out of alignment with its own date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradingDay {
    /// Position in the original price sequence.
    pub index: usize,
    pub date: NaiveDate,
    pub adj_close: f64,
    /// Fractional change from the previous day; `0.0` on the first day.
    pub daily_return: f64,
    pub year: i32,
}
