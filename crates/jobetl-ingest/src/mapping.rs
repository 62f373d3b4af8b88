//! Column-mapping configurations produced by the external mapping tool.

use std::path::{Path, PathBuf};

use crate::csv_table::read_csv_table;
use crate::error::{IngestError, Result};

pub const RAW_COLUMN_HEADER: &str = "raw_column";
pub const CANONICAL_FIELD_HEADER: &str = "canonical_field";

/// One `raw_column -> canonical_field` line, as written.
///
/// The target is kept as text; the schema mapper decides whether it names a
/// canonical field, the `unused` marker, or nothing valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub raw_column: String,
    pub canonical_field: String,
    /// 1-based line in the configuration file (header is line 1).
    pub line: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingConfig {
    pub path: Option<PathBuf>,
    pub entries: Vec<MappingEntry>,
}

impl MappingConfig {
    /// Build a configuration in memory, e.g. for tests.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let entries = pairs
            .into_iter()
            .enumerate()
            .map(|(idx, (raw, field))| MappingEntry {
                raw_column: raw.to_string(),
                canonical_field: field.to_string(),
                line: idx + 2,
            })
            .collect();
        Self {
            path: None,
            entries,
        }
    }
}

/// Read a mapping configuration CSV with a `raw_column,canonical_field` header.
///
/// Lines with an empty raw column are ignored.
pub fn read_mapping_config(path: &Path) -> Result<MappingConfig> {
    let table = read_csv_table(path)?;
    let column = |name: &str| {
        table
            .column_index(name)
            .ok_or_else(|| IngestError::MissingMappingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            })
    };
    let raw_idx = column(RAW_COLUMN_HEADER)?;
    let field_idx = column(CANONICAL_FIELD_HEADER)?;

    let entries = table
        .rows
        .iter()
        .enumerate()
        .filter_map(|(idx, row)| {
            let raw = row.get(raw_idx).map(String::as_str).unwrap_or_default();
            if raw.is_empty() {
                return None;
            }
            Some(MappingEntry {
                raw_column: raw.to_string(),
                canonical_field: row.get(field_idx).cloned().unwrap_or_default(),
                line: idx + 2,
            })
        })
        .collect();

    Ok(MappingConfig {
        path: Some(path.to_path_buf()),
        entries,
    })
}
