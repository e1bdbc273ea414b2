//! Presidency terms and the partitioning of yearly returns by party.

use crate::domain::{Party, PartyTerm, PartitionedReturn, PresidencyRecord, YearlyReturn};
use crate::error::AnalysisError;
use chrono::{Datelike, NaiveDate};

/// Terms starting before this year are left out of the study.
pub const MIN_TERM_START_YEAR: i32 = 1920;

const TERM_DATE_FORMATS: [&str; 2] = ["%B %d %Y", "%B %d, %Y"];

/// Year of a free-text term date such as `March 4 1921`.
///
/// Tries a structured month/day/year parse first. Anything else falls back to
/// the year being the third whitespace-separated token, so `Mar 4 1921 (noon)`
/// still resolves to 1921.
pub fn term_year(field: &str) -> Result<i32, AnalysisError> {
    let trimmed = field.trim();
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    // Checked before parsing: chrono would happily read `March 1921` as day 19 of year 21.
    let token = tokens.get(2).ok_or_else(|| {
        AnalysisError::format(format!(
            "term date '{trimmed}' has {} token(s), expected 'Month Day Year'",
            tokens.len()
        ))
    })?;

    for fmt in TERM_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Ok(date.year());
        }
    }

    token
        .trim_end_matches(',')
        .parse::<i32>()
        .map_err(|_| AnalysisError::format(format!("term date '{trimmed}': '{token}' is not a year")))
}

/// Terms of `party` starting in or after 1920, in table order.
pub fn presidency_table(
    rows: &[PresidencyRecord],
    party: Party,
) -> Result<Vec<PartyTerm>, AnalysisError> {
    presidency_table_since(rows, party, MIN_TERM_START_YEAR)
}

/// Terms of `party` starting in or after `min_start_year`, in table order.
///
/// Every row's dates are parsed, including rows that end up filtered out, so a
/// malformed table fails loudly whichever party is requested.
pub fn presidency_table_since(
    rows: &[PresidencyRecord],
    party: Party,
    min_start_year: i32,
) -> Result<Vec<PartyTerm>, AnalysisError> {
    let mut terms = Vec::new();
    for row in rows {
        let start = term_year(&row.start)?;
        let end = term_year(&row.end)?;
        if start >= min_start_year && row.party.trim() == party.name() {
            terms.push(PartyTerm { start, end, party });
        }
    }
    Ok(terms)
}

/// Yearly returns falling inside each term, term by term.
///
/// Output order is terms outer, yearly returns inner. A year covered by two
/// overlapping terms appears once per term.
pub fn partition_by_presidency(
    yearly: &[YearlyReturn],
    terms: &[PartyTerm],
) -> Vec<PartitionedReturn> {
    terms
        .iter()
        .flat_map(|term| {
            yearly
                .iter()
                .filter(move |y| term.covers(y.year))
                .map(|&y| PartitionedReturn::from(y))
        })
        .collect()
}
