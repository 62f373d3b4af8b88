//! Unmatched-value diagnostics.
//!
//! The log is an accumulator threaded through the stages. Entries are only
//! ever appended; no stage reads them back. They exist to drive maintenance
//! of the reference tables.

use std::collections::BTreeMap;

use crate::field::Field;
use crate::record::SourceRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A raw categorical value had no entry in its reference table.
    UnmatchedReference,
    /// A present value failed a plausibility check and was reset.
    SoftValidationFlag,
    /// A numeric or date value could not be parsed.
    Unparseable,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::UnmatchedReference => "unmatched_reference",
            DiagnosticKind::SoftValidationFlag => "soft_validation_flag",
            DiagnosticKind::Unparseable => "unparseable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DiagnosticEntry {
    pub field: Field,
    pub raw_value: String,
    /// Source dataset identifier.
    pub source: String,
    pub row: usize,
    pub kind: DiagnosticKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticLog {
    entries: Vec<DiagnosticEntry>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: DiagnosticEntry) {
        self.entries.push(entry);
    }

    pub fn unmatched(&mut self, field: Field, raw: &str, lineage: &SourceRef) {
        self.record(field, raw, lineage, DiagnosticKind::UnmatchedReference, None);
    }

    pub fn unparseable(&mut self, field: Field, raw: &str, lineage: &SourceRef) {
        self.record(field, raw, lineage, DiagnosticKind::Unparseable, None);
    }

    pub fn soft_flag(
        &mut self,
        field: Field,
        raw: &str,
        lineage: &SourceRef,
        detail: impl Into<String>,
    ) {
        self.record(
            field,
            raw,
            lineage,
            DiagnosticKind::SoftValidationFlag,
            Some(detail.into()),
        );
    }

    fn record(
        &mut self,
        field: Field,
        raw: &str,
        lineage: &SourceRef,
        kind: DiagnosticKind,
        detail: Option<String>,
    ) {
        self.entries.push(DiagnosticEntry {
            field,
            raw_value: raw.to_string(),
            source: lineage.source.clone(),
            row: lineage.row,
            kind,
            detail,
        });
    }

    /// Append another log, keeping its order after ours.
    pub fn extend(&mut self, other: DiagnosticLog) {
        self.entries.extend(other.entries);
    }

    pub fn entries(&self) -> &[DiagnosticEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_by_field(&self, kind: DiagnosticKind) -> BTreeMap<Field, usize> {
        let mut counts = BTreeMap::new();
        for entry in self.entries.iter().filter(|entry| entry.kind == kind) {
            *counts.entry(entry.field).or_insert(0) += 1;
        }
        counts
    }
}
