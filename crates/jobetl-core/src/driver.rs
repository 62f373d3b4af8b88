//! Run driver: sources in, decomposed tables and a run summary out.
//!
//! Source files are independent. A file that cannot be read or mapped is
//! recorded as a failure and its siblings carry on. Combining waits for
//! every source, since dimension ids depend on the full merged set.

use std::time::Instant;

use anyhow::{Context, Result};
use jobetl_ingest::{SourceFile, read_csv_table, read_mapping_config};
use jobetl_map::{MappedBatch, MappingReport, apply_mapping, check_mapping};
use jobetl_model::{
    CanonicalRecord, DecomposedTables, DiagnosticKind, DiagnosticLog, DroppedRecord, FileFailure,
    PipelineOptions, RunSummary, SourceSummary,
};
use jobetl_standards::ReferenceRegistry;
use tracing::{debug, error, info, info_span};

use crate::combine::combine;
use crate::pipeline::RecordPipeline;

/// Records of one source after the per-record stages.
#[derive(Debug, Clone, Default)]
pub struct SourceResult {
    pub summary: SourceSummary,
    pub passed: Vec<CanonicalRecord>,
    pub dropped: Vec<DroppedRecord>,
    pub diagnostics: DiagnosticLog,
}

/// Everything a run produces.
#[derive(Debug, Clone, Default)]
pub struct RunOutput {
    pub tables: DecomposedTables,
    pub diagnostics: DiagnosticLog,
    pub summary: RunSummary,
}

/// Run the per-record stages over an already mapped batch.
pub fn process_batch(pipeline: &RecordPipeline<'_>, batch: MappedBatch) -> SourceResult {
    let MappedBatch {
        source,
        records,
        plan,
    } = batch;
    let mut result = SourceResult {
        summary: SourceSummary {
            source,
            records_in: records.len(),
            dropped_columns: plan.dropped_columns(),
            ..SourceSummary::default()
        },
        ..SourceResult::default()
    };

    for processed in pipeline.process_all(records) {
        if let Some(dropped) = processed.dropped() {
            debug!(
                source = %dropped.source,
                row = dropped.row,
                record_id = %dropped.record_id,
                "dropping record"
            );
            result.dropped.push(dropped);
        } else {
            result.passed.push(processed.record);
        }
        result.diagnostics.extend(processed.diagnostics);
    }
    result.summary.records_passed = result.passed.len();
    result.summary.records_dropped = result.dropped.len();
    result
}

/// Read, map and process one source file.
pub fn process_source(pipeline: &RecordPipeline<'_>, source: &SourceFile) -> Result<SourceResult> {
    let mapping_path = source.require_mapping()?;
    let config = read_mapping_config(mapping_path)
        .with_context(|| format!("reading mapping for source '{}'", source.name))?;
    let table = read_csv_table(&source.data_path)
        .with_context(|| format!("reading source '{}'", source.name))?;
    let batch = apply_mapping(&source.name, &table, &config)
        .with_context(|| format!("mapping source '{}'", source.name))?;
    Ok(process_batch(pipeline, batch))
}

/// Check a source's mapping configuration without processing any record.
pub fn check_source(source: &SourceFile) -> Result<MappingReport> {
    let mapping_path = source.require_mapping()?;
    let config = read_mapping_config(mapping_path)?;
    let table = read_csv_table(&source.data_path)?;
    let report = check_mapping(&source.name, &table.headers, &config)?;
    Ok(report)
}

/// Process every source, then combine the survivors.
pub fn run(
    sources: &[SourceFile],
    registry: &ReferenceRegistry,
    options: &PipelineOptions,
) -> Result<RunOutput> {
    run_with_progress(sources, registry, options, |_| {})
}

/// [`run`], calling `on_source` after each source file finishes.
pub fn run_with_progress(
    sources: &[SourceFile],
    registry: &ReferenceRegistry,
    options: &PipelineOptions,
    mut on_source: impl FnMut(&SourceFile),
) -> Result<RunOutput> {
    let start = Instant::now();
    let pipeline =
        RecordPipeline::new(registry, options).context("building description patterns")?;

    let mut output = RunOutput::default();
    let mut passed = Vec::new();

    for source in sources {
        let span = info_span!("source", source = %source.name);
        let _guard = span.enter();

        match process_source(&pipeline, source) {
            Ok(result) => {
                info!(
                    records_in = result.summary.records_in,
                    passed = result.summary.records_passed,
                    dropped = result.summary.records_dropped,
                    "source processed"
                );
                absorb(&mut output, result, &mut passed);
            }
            Err(e) => {
                error!(error = %format!("{e:#}"), "source failed");
                output.summary.file_failures.push(FileFailure {
                    source: source.name.clone(),
                    error: format!("{e:#}"),
                });
            }
        }
        on_source(source);
    }

    output.tables = combine(&passed);
    let summary = &mut output.summary;
    summary.unmatched_by_field = output
        .diagnostics
        .count_by_field(DiagnosticKind::UnmatchedReference);
    summary.soft_flags_by_field = output
        .diagnostics
        .count_by_field(DiagnosticKind::SoftValidationFlag);

    info!(
        sources = sources.len(),
        failed = summary.file_failures.len(),
        records_in = summary.records_in,
        passed = summary.records_passed,
        dropped = summary.records_dropped,
        duration_ms = start.elapsed().as_millis(),
        "run complete"
    );
    Ok(output)
}

fn absorb(output: &mut RunOutput, result: SourceResult, passed: &mut Vec<CanonicalRecord>) {
    let summary = &mut output.summary;
    summary.records_in += result.summary.records_in;
    summary.records_passed += result.summary.records_passed;
    summary.records_dropped += result.summary.records_dropped;
    summary.sources.push(result.summary);
    summary.dropped.extend(result.dropped);
    output.diagnostics.extend(result.diagnostics);
    passed.extend(result.passed);
}
