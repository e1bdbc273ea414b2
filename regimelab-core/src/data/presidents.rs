//! Presidency reference table loading.
//!
//! The table is a CSV with a `Start,End,Party` header (plus an optional
//! `President` column). It is read wholesale before the pipeline runs; date
//! fields stay free text until the presidency table builder parses them.

use super::provider::DataError;
use crate::domain::PresidencyRecord;
use std::io::Read;
use std::path::Path;

/// Load the reference table from a CSV file.
pub fn load_presidents(path: &Path) -> Result<Vec<PresidencyRecord>, DataError> {
    let file = std::fs::File::open(path)
        .map_err(|e| DataError::ImportError(format!("{}: {e}", path.display())))?;
    read_presidents(file)
}

/// Read the reference table from any CSV source.
pub fn read_presidents<R: Read>(reader: R) -> Result<Vec<PresidencyRecord>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let records = rdr
        .deserialize::<PresidencyRecord>()
        .enumerate()
        .map(|(i, row)| {
            row.map_err(|e| DataError::ImportError(format!("presidents row {}: {e}", i + 2)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if records.is_empty() {
        return Err(DataError::ImportError("presidents table is empty".into()));
    }
    Ok(records)
}
