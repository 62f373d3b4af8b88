//! Source discovery: data files and their mapping configurations.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{IngestError, Result};

/// Suffix of a mapping configuration that sits next to its source file.
pub const MAPPING_SUFFIX: &str = ".mapping.csv";

/// Directory under the input root holding `<source>.csv` mappings.
pub const MAPPINGS_DIR: &str = "mappings";

/// A source data file with the mapping configuration found for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Source identifier: the file stem.
    pub name: String,
    pub data_path: PathBuf,
    pub mapping_path: Option<PathBuf>,
}

impl SourceFile {
    /// Mapping configuration path, or the locations that were searched.
    pub fn require_mapping(&self) -> Result<&Path> {
        self.mapping_path
            .as_deref()
            .ok_or_else(|| IngestError::MappingNotFound {
                source_name: self.name.clone(),
                searched: mapping_candidates(&self.data_path, &self.name),
            })
    }
}

/// Lists all CSV files in a directory.
///
/// Returns files sorted by filename.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if path.is_file() && is_csv {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn is_mapping_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.to_ascii_lowercase().ends_with(MAPPING_SUFFIX))
}

fn mapping_candidates(data_path: &Path, name: &str) -> Vec<PathBuf> {
    let dir = data_path.parent().unwrap_or_else(|| Path::new("."));
    vec![
        dir.join(format!("{name}{MAPPING_SUFFIX}")),
        dir.join(MAPPINGS_DIR).join(format!("{name}.csv")),
    ]
}

/// Source data files directly under `input_dir`, sorted by name.
///
/// A file is paired with `<source>.mapping.csv` beside it, or else with
/// `mappings/<source>.csv` under the input root.
pub fn discover_sources(input_dir: &Path) -> Result<Vec<SourceFile>> {
    let mut sources = Vec::new();
    for path in list_csv_files(input_dir)? {
        if is_mapping_file(&path) {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let name = name.to_string();
        let mapping_path = mapping_candidates(&path, &name)
            .into_iter()
            .find(|candidate| candidate.is_file());
        debug!(source = %name, mapping = ?mapping_path, "discovered source");
        sources.push(SourceFile {
            name,
            data_path: path,
            mapping_path,
        });
    }
    Ok(sources)
}

/// A single source file given directly, named after its stem.
pub fn source_from_path(data_path: &Path, mapping_path: Option<&Path>) -> SourceFile {
    let name = data_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("source")
        .to_string();
    let mapping_path = mapping_path.map(Path::to_path_buf).or_else(|| {
        mapping_candidates(data_path, &name)
            .into_iter()
            .find(|candidate| candidate.is_file())
    });
    SourceFile {
        name,
        data_path: data_path.to_path_buf(),
        mapping_path,
    }
}
