//! Central-tendency statistics over a group of yearly returns.
//!
//! Every statistic is a pure function: slice of returns in, `Option<f64>` out.
//! `None` marks a value that is undefined for the input (mean of nothing,
//! sample variance of a single observation) rather than a silent NaN.

use serde::{Deserialize, Serialize};

/// Summary of one group of returns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Sample variance (n - 1 denominator).
    pub variance: Option<f64>,
    /// Population variance (n denominator).
    pub population_variance: Option<f64>,
}

impl GroupStats {
    pub fn compute(values: &[f64]) -> Self {
        Self {
            count: values.len(),
            mean: mean(values),
            median: median(values),
            variance: sample_variance(values),
            population_variance: population_variance(values),
        }
    }
}

// ─── Individual statistics ──────────────────────────────────────────

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Middle value; the average of the two middle values for even counts.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Variance with `ddof` delta degrees of freedom; `None` when `n <= ddof`.
fn variance_ddof(values: &[f64], ddof: usize) -> Option<f64> {
    let n = values.len();
    if n <= ddof {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some(ss / (n - ddof) as f64)
}

pub fn sample_variance(values: &[f64]) -> Option<f64> {
    variance_ddof(values, 1)
}

pub fn population_variance(values: &[f64]) -> Option<f64> {
    variance_ddof(values, 0)
}
