//! Aggregated return records.

use serde::{Deserialize, Serialize};

/// Sum of the daily returns of one contiguous run of same-year trading days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyReturn {
    pub year: i32,
    pub returns: f64,
}

/// A yearly return attributed to one party's term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartitionedReturn {
    pub year: i32,
    pub returns: f64,
}

impl From<YearlyReturn> for PartitionedReturn {
    fn from(y: YearlyReturn) -> Self {
        Self {
            year: y.year,
            returns: y.returns,
        }
    }
}
