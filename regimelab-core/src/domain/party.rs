//! Political parties, presidential terms, and the raw reference-table rows.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two parties the study compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Party {
    Republican,
    Democratic,
}

impl Party {
    /// Name as written in the reference table's `Party` column.
    pub fn name(&self) -> &'static str {
        match self {
            Party::Republican => "Republican",
            Party::Democratic => "Democratic",
        }
    }

    /// Short tag used in report column headers (`REP`, `DEM`).
    pub fn tag(&self) -> &'static str {
        match self {
            Party::Republican => "REP",
            Party::Democratic => "DEM",
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Party {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "republican" | "rep" | "r" => Ok(Party::Republican),
            "democratic" | "democrat" | "dem" | "d" => Ok(Party::Democratic),
            other => Err(format!("unknown party '{other}'")),
        }
    }
}

/// A term of office as a half-open year interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyTerm {
    pub start: i32,
    pub end: i32,
    pub party: Party,
}

impl PartyTerm {
    /// True when `year` falls in `[start, end)`.
    pub fn covers(&self, year: i32) -> bool {
        self.start <= year && year < self.end
    }
}

/// One row of the presidency reference table, as loaded.
///
/// `start` and `end` are free text (`March 4 1921`); `party` is kept verbatim so
/// rows for parties outside the study (Whig, Federalist, ...) load fine and are
/// simply never selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresidencyRecord {
    #[serde(rename = "President", default)]
    pub president: Option<String>,
    #[serde(rename = "Start")]
    pub start: String,
    #[serde(rename = "End")]
    pub end: String,
    #[serde(rename = "Party")]
    pub party: String,
}

impl PresidencyRecord {
    pub fn new(start: impl Into<String>, end: impl Into<String>, party: impl Into<String>) -> Self {
        Self {
            president: None,
            start: start.into(),
            end: end.into(),
            party: party.into(),
        }
    }
}
