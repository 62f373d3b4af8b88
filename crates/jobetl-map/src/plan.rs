//! Interpretation of a mapping configuration against a source header.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use jobetl_ingest::MappingConfig;
use jobetl_model::{Field, UNUSED_MARKER};

use crate::error::MappingError;

/// A source column bound to a canonical field.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ColumnBinding {
    pub column: String,
    /// Position of the column in the source header.
    pub index: usize,
    pub field: Field,
}

/// How every source column is treated, before any record is touched.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct SchemaPlan {
    pub source: String,
    /// In configuration order; earlier bindings win for single-valued fields.
    pub bindings: Vec<ColumnBinding>,
    /// Columns explicitly marked `unused`.
    pub unused: Vec<String>,
    /// Columns the configuration does not mention.
    pub unmapped: Vec<String>,
    pub missing_required: Vec<Field>,
}

impl SchemaPlan {
    pub fn mapped_fields(&self) -> BTreeSet<Field> {
        self.bindings.iter().map(|binding| binding.field).collect()
    }

    /// Columns that do not reach the canonical record.
    pub fn dropped_columns(&self) -> Vec<String> {
        let mut dropped: Vec<String> = self.unused.iter().chain(&self.unmapped).cloned().collect();
        dropped.sort();
        dropped
    }

    /// Fails with [`MappingError::SchemaMismatch`] when a required field has
    /// no column.
    pub fn ensure_required(&self) -> Result<(), MappingError> {
        if self.missing_required.is_empty() {
            return Ok(());
        }
        Err(MappingError::SchemaMismatch {
            source_name: self.source.clone(),
            missing: self.missing_required.clone(),
        })
    }
}

enum Target {
    Field(Field),
    Unused,
    Blank,
}

fn parse_target(column: &str, raw: &str, line: usize) -> Result<Target, MappingError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Target::Blank);
    }
    if trimmed.eq_ignore_ascii_case(UNUSED_MARKER) {
        return Ok(Target::Unused);
    }
    Field::from_str(trimmed)
        .map(Target::Field)
        .map_err(|_| MappingError::UnknownField {
            column: column.to_string(),
            field: trimmed.to_string(),
            line,
        })
}

/// Resolve `config` against `headers`.
///
/// Structural errors (unknown targets, a column claimed by two fields, a
/// mapped column missing from the data) fail here. Missing required fields
/// are recorded on the plan; see [`SchemaPlan::ensure_required`].
pub fn plan_mapping(
    source: &str,
    headers: &[String],
    config: &MappingConfig,
) -> Result<SchemaPlan, MappingError> {
    let mut targets: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    let mut plan = SchemaPlan {
        source: source.to_string(),
        ..SchemaPlan::default()
    };
    let mut mentioned: BTreeSet<&str> = BTreeSet::new();

    for entry in &config.entries {
        let column = entry.raw_column.as_str();
        let target = parse_target(column, &entry.canonical_field, entry.line)?;
        let label = match &target {
            Target::Field(field) => field.name().to_string(),
            Target::Unused => UNUSED_MARKER.to_string(),
            Target::Blank => continue,
        };
        let seen = targets.entry(column).or_default();
        if seen.contains(&label) {
            continue;
        }
        seen.push(label);
        if seen.len() > 1 {
            return Err(MappingError::AmbiguousColumn {
                column: column.to_string(),
                fields: seen.clone(),
            });
        }

        let index = headers.iter().position(|h| h == column);
        match (target, index) {
            (Target::Field(field), Some(index)) => {
                mentioned.insert(column);
                plan.bindings.push(ColumnBinding {
                    column: column.to_string(),
                    index,
                    field,
                });
            }
            (Target::Field(field), None) => {
                return Err(MappingError::MappedColumnAbsent {
                    column: column.to_string(),
                    field,
                });
            }
            (Target::Unused, Some(_)) => {
                mentioned.insert(column);
                plan.unused.push(column.to_string());
            }
            (Target::Unused, None) | (Target::Blank, _) => {}
        }
    }

    plan.unmapped = headers
        .iter()
        .filter(|h| !h.is_empty() && !mentioned.contains(h.as_str()))
        .cloned()
        .collect();

    let mapped = plan.mapped_fields();
    plan.missing_required = Field::REQUIRED
        .iter()
        .copied()
        .filter(|field| !mapped.contains(field))
        .collect();

    Ok(plan)
}
