//! Shared CSV utilities for loading reference tables.

use std::collections::BTreeMap;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::ReferenceError;

pub type CsvRow = BTreeMap<String, String>;

/// Read a CSV file into a vector of row maps.
///
/// Handles BOM characters and trims whitespace from values. Every name in
/// `required` must be a header of the file.
pub fn read_csv_rows(path: &Path, required: &[&str]) -> Result<Vec<CsvRow>, ReferenceError> {
    let csv_error = |e: csv::Error| ReferenceError::Csv {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let bytes = std::fs::read(path).map_err(|e| ReferenceError::io(path, e))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes.as_slice());

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|h| h.trim_matches('\u{feff}').trim().to_string())
        .collect();

    for column in required {
        if !headers.iter().any(|h| h == column) {
            return Err(ReferenceError::MissingColumn {
                path: path.to_path_buf(),
                column: (*column).to_string(),
            });
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let mut row = BTreeMap::new();
        for (idx, value) in record.iter().enumerate() {
            let key = headers.get(idx).cloned().unwrap_or_default();
            row.insert(key, value.trim().to_string());
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Get a field value from a row, returning empty string if not present.
pub fn get_field<'a>(row: &'a CsvRow, key: &str) -> &'a str {
    row.get(key).map_or("", String::as_str)
}

/// Get an optional field value from a row (None if empty or missing).
pub fn get_optional<'a>(row: &'a CsvRow, key: &str) -> Option<&'a str> {
    row.get(key).map(String::as_str).filter(|v| !v.is_empty())
}

/// Split a pipe-separated list cell into its trimmed, non-empty items.
pub fn split_list(cell: &str) -> impl Iterator<Item = &str> {
    cell.split('|').map(str::trim).filter(|s| !s.is_empty())
}

pub(crate) fn parse_number<T: std::str::FromStr>(
    path: &Path,
    column: &str,
    value: &str,
) -> Result<T, ReferenceError> {
    value.parse().map_err(|_| ReferenceError::InvalidNumber {
        path: path.to_path_buf(),
        column: column.to_string(),
        value: value.to_string(),
    })
}
