//! Return pipeline: prices → daily returns → yearly returns → party partitions.
//!
//! Every stage is a pure function that allocates its own output.

pub mod daily;
pub mod presidency;
pub mod yearly;
pub mod years;

pub use daily::daily_returns;
pub use presidency::{
    partition_by_presidency, presidency_table, presidency_table_since, term_year,
    MIN_TERM_START_YEAR,
};
pub use yearly::{yearly_returns, yearly_returns_from_parts};
pub use years::{parse_trade_date, year_labels};

use crate::domain::{PricePoint, TradingDay, YearlyReturn};
use crate::error::AnalysisError;
use tracing::debug;

/// Build one [`TradingDay`] per price point: daily return and year attached.
pub fn annotate_days(prices: &[PricePoint]) -> Result<Vec<TradingDay>, AnalysisError> {
    let closes: Vec<f64> = prices.iter().map(|p| p.adj_close).collect();
    let returns = daily_returns(&closes)?;

    Ok(prices
        .iter()
        .zip(returns)
        .enumerate()
        .map(|(index, (p, daily_return))| TradingDay {
            index,
            date: p.date,
            adj_close: p.adj_close,
            daily_return,
            year: p.year(),
        })
        .collect())
}

/// Prices straight to yearly returns.
pub fn yearly_series(prices: &[PricePoint]) -> Result<Vec<YearlyReturn>, AnalysisError> {
    let days = annotate_days(prices)?;
    let yearly = yearly_returns(&days);
    debug!(days = days.len(), years = yearly.len(), "rolled up daily returns");
    Ok(yearly)
}
