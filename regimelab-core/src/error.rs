//! Error taxonomy for the return pipeline.

use thiserror::Error;

/// Errors raised while turning price series into partitioned yearly returns.
///
/// Every variant is fatal for the series being processed: the pipeline never
/// drops data silently or returns a partial result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// The price preceding position `index` is zero, so no return exists.
    #[error("division by zero: price before index {index} is zero")]
    DivisionByZero { index: usize },

    /// A date or term-table field could not be parsed.
    #[error("format error: {0}")]
    Format(String),

    /// The price series for a symbol could not be obtained.
    #[error("data unavailable for '{symbol}': {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// Year labels and daily returns are not the same length.
    #[error("length mismatch: {years} year labels vs {returns} daily returns")]
    LengthMismatch { years: usize, returns: usize },
}

impl AnalysisError {
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    pub fn unavailable(symbol: impl Into<String>, reason: impl ToString) -> Self {
        Self::DataUnavailable {
            symbol: symbol.into(),
            reason: reason.to_string(),
        }
    }
}
