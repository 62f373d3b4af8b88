use std::collections::BTreeMap;

use crate::field::Field;
use crate::ids::RecordId;
use crate::record::DropReason;

/// A record excluded from the fact table, with enough lineage to retry it.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DroppedRecord {
    pub source: String,
    pub row: usize,
    pub source_id: Option<String>,
    pub record_id: RecordId,
    pub reasons: Vec<DropReason>,
}

/// A source file whose processing was aborted.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FileFailure {
    pub source: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct SourceSummary {
    pub source: String,
    pub records_in: usize,
    pub records_passed: usize,
    pub records_dropped: usize,
    /// Columns present in the source but absent from its mapping.
    pub dropped_columns: Vec<String>,
}

/// Operator-facing account of one run.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct RunSummary {
    pub records_in: usize,
    pub records_passed: usize,
    pub records_dropped: usize,
    pub sources: Vec<SourceSummary>,
    pub dropped: Vec<DroppedRecord>,
    pub unmatched_by_field: BTreeMap<Field, usize>,
    pub soft_flags_by_field: BTreeMap<Field, usize>,
    pub file_failures: Vec<FileFailure>,
}

impl RunSummary {
    /// Drop counts grouped by reason label.
    pub fn drop_reason_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.dropped {
            for reason in &record.reasons {
                *counts.entry(reason.to_string()).or_insert(0) += 1;
            }
        }
        counts
    }

    pub fn has_failures(&self) -> bool {
        !self.file_failures.is_empty()
    }
}
