//! Run artefact writers.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::{CsvWriter, SerWriter};
use tracing::{info, info_span};

use jobetl_model::{DecomposedTables, DiagnosticLog, DroppedRecord, RunSummary};

use crate::frames::OutputTable;

pub const UNMATCHED_VALUES_FILE: &str = "unmatched_values.csv";
pub const DROPPED_RECORDS_FILE: &str = "dropped_records.csv";
pub const RUN_SUMMARY_FILE: &str = "run_summary.json";

/// Paths written by [`write_outputs`], in write order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputPaths {
    pub tables: Vec<PathBuf>,
    pub unmatched_values: PathBuf,
    pub dropped_records: PathBuf,
    pub run_summary: PathBuf,
}

impl OutputPaths {
    pub fn all(&self) -> impl Iterator<Item = &Path> {
        self.tables
            .iter()
            .chain([&self.unmatched_values, &self.dropped_records, &self.run_summary])
            .map(PathBuf::as_path)
    }
}

/// Write every table, the diagnostic report, the dropped-record listing and
/// the summary under `output_dir`, creating it when needed.
pub fn write_outputs(
    output_dir: &Path,
    tables: &DecomposedTables,
    diagnostics: &DiagnosticLog,
    summary: &RunSummary,
) -> Result<OutputPaths> {
    let span = info_span!("output", dir = %output_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    fs::create_dir_all(output_dir)
        .with_context(|| format!("create output directory {}", output_dir.display()))?;

    let paths = OutputPaths {
        tables: write_tables(output_dir, tables)?,
        unmatched_values: write_diagnostics(&output_dir.join(UNMATCHED_VALUES_FILE), diagnostics)?,
        dropped_records: write_dropped(&output_dir.join(DROPPED_RECORDS_FILE), &summary.dropped)?,
        run_summary: write_summary(&output_dir.join(RUN_SUMMARY_FILE), summary)?,
    };

    info!(
        files = paths.all().count(),
        duration_ms = start.elapsed().as_millis(),
        "outputs written"
    );
    Ok(paths)
}

/// One CSV per entity table, in load order.
pub fn write_tables(output_dir: &Path, tables: &DecomposedTables) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(OutputTable::LOAD_ORDER.len());
    for table in OutputTable::LOAD_ORDER {
        let mut df = table
            .frame(tables)
            .with_context(|| format!("build {} frame", table.name()))?;
        let path = output_dir.join(table.file_name());
        let file = File::create(&path).with_context(|| format!("create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        CsvWriter::new(&mut writer)
            .include_header(true)
            .finish(&mut df)
            .with_context(|| format!("write {}", path.display()))?;
        info!(table = table.name(), rows = df.height(), "table written");
        written.push(path);
    }
    Ok(written)
}

/// Diagnostic report: one line per entry, in emission order.
pub fn write_diagnostics(path: &Path, diagnostics: &DiagnosticLog) -> Result<PathBuf> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    writer.write_record(["field", "raw_value", "source", "row", "kind", "detail"])?;
    for entry in diagnostics.entries() {
        let row = entry.row.to_string();
        writer.write_record([
            entry.field.name(),
            entry.raw_value.as_str(),
            entry.source.as_str(),
            row.as_str(),
            entry.kind.as_str(),
            entry.detail.as_deref().unwrap_or_default(),
        ])?;
    }
    writer
        .flush()
        .with_context(|| format!("write {}", path.display()))?;
    Ok(path.to_path_buf())
}

/// Lineage of every dropped record so the failed subset can be rerun.
pub fn write_dropped(path: &Path, dropped: &[DroppedRecord]) -> Result<PathBuf> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    writer.write_record(["source", "row", "source_id", "record_id", "reasons"])?;
    for record in dropped {
        let reasons = record
            .reasons
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        writer.write_record([
            record.source.clone(),
            record.row.to_string(),
            record.source_id.clone().unwrap_or_default(),
            record.record_id.to_hex(),
            reasons,
        ])?;
    }
    writer
        .flush()
        .with_context(|| format!("write {}", path.display()))?;
    Ok(path.to_path_buf())
}

pub fn write_summary(path: &Path, summary: &RunSummary) -> Result<PathBuf> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), summary)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(path.to_path_buf())
}
