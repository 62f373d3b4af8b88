//! Per-record stage sequence.
//!
//! Extraction, normalization, enrichment and validation run on one record at
//! a time against the shared registry; records never see each other here.
//! Each record gets its own diagnostic log so workers need no locking, and
//! logs are concatenated in input order afterwards.

use std::time::Instant;

use jobetl_model::{
    CanonicalRecord, DiagnosticLog, DroppedRecord, PipelineOptions, RawRecord,
};
use jobetl_standards::ReferenceRegistry;
use jobetl_transform::{SignalExtractor, TransformError, enrich_record, normalize_record};
use jobetl_validate::{Validator, Verdict};
use rayon::prelude::*;
use tracing::{debug_span, info, info_span};

/// One record after every per-record stage.
#[derive(Debug, Clone)]
pub struct ProcessedRecord {
    pub record: CanonicalRecord,
    pub verdict: Verdict,
    pub diagnostics: DiagnosticLog,
}

impl ProcessedRecord {
    pub fn dropped(&self) -> Option<DroppedRecord> {
        (self.verdict == Verdict::Dropped).then(|| DroppedRecord {
            source: self.record.lineage.source.clone(),
            row: self.record.lineage.row,
            source_id: self.record.lineage.source_id.clone(),
            record_id: self.record.id,
            reasons: self.record.flags.invalid.clone(),
        })
    }
}

/// Stage sequence bound to the reference tables and options of one run.
#[derive(Debug)]
pub struct RecordPipeline<'r> {
    registry: &'r ReferenceRegistry,
    options: &'r PipelineOptions,
    extractor: SignalExtractor<'r>,
}

impl<'r> RecordPipeline<'r> {
    pub fn new(
        registry: &'r ReferenceRegistry,
        options: &'r PipelineOptions,
    ) -> Result<Self, TransformError> {
        Ok(Self {
            registry,
            options,
            extractor: SignalExtractor::new(registry)?,
        })
    }

    pub fn process(&self, mut raw: RawRecord) -> ProcessedRecord {
        let mut diagnostics = DiagnosticLog::new();
        let row = raw.lineage.row;
        debug_span!("extract", row).in_scope(|| self.extractor.extract(&mut raw));
        let mut record = debug_span!("normalize", row)
            .in_scope(|| normalize_record(raw, self.registry, &mut diagnostics));
        debug_span!("enrich", row)
            .in_scope(|| enrich_record(&mut record, self.registry, &mut diagnostics));
        let verdict = debug_span!("validate", row).in_scope(|| {
            Validator::new(self.registry, self.options).validate(&mut record, &mut diagnostics)
        });
        ProcessedRecord {
            record,
            verdict,
            diagnostics,
        }
    }

    /// Process a batch, in parallel when enabled. Output keeps input order.
    pub fn process_all(&self, records: Vec<RawRecord>) -> Vec<ProcessedRecord> {
        let span = info_span!("transform", records = records.len(), parallel = self.options.parallel);
        let _guard = span.enter();
        let start = Instant::now();

        let processed: Vec<ProcessedRecord> = if self.options.parallel {
            records.into_par_iter().map(|raw| self.process(raw)).collect()
        } else {
            records.into_iter().map(|raw| self.process(raw)).collect()
        };

        let extracted: usize = processed.iter().map(|p| p.record.flags.extracted.len()).sum();
        let enriched: usize = processed.iter().map(|p| p.record.flags.enriched.len()).sum();
        let dropped = processed
            .iter()
            .filter(|p| p.verdict == Verdict::Dropped)
            .count();
        info!(
            extracted,
            enriched,
            dropped,
            duration_ms = start.elapsed().as_millis(),
            "record stages complete"
        );
        processed
    }
}
