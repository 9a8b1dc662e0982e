//! Read CSV exports into raw rows keyed by header name.

use super::InputError;
use crate::place::RawRow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read every record of a headed CSV into rows.
///
/// Ragged records are accepted: missing trailing cells are absent from the
/// row, surplus cells are dropped.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RawRow>, InputError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .filter(|(h, _)| !h.is_empty())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Read a CSV file from disk.
pub fn read_csv_file(path: &Path) -> Result<Vec<RawRow>, InputError> {
    read_rows(File::open(path)?)
}
