//! Mapping coverage report for the `check-mapping` command.

use rapidfuzz::distance::jaro_winkler::similarity as jaro_similarity;

use jobetl_ingest::MappingConfig;
use jobetl_model::Field;

use crate::error::MappingError;
use crate::plan::{SchemaPlan, plan_mapping};

/// Minimum similarity for a field to be suggested for an unmapped column.
const SUGGESTION_THRESHOLD: f64 = 0.85;

/// Field names compare best when their underscores read as spaces.
fn normalize_text(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(['_', '-', '.', '/', '\\'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FieldSuggestion {
    pub column: String,
    pub field: Field,
    pub score: f64,
}

/// Coverage of one source by its mapping configuration.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MappingReport {
    pub plan: SchemaPlan,
    pub suggestions: Vec<FieldSuggestion>,
}

impl MappingReport {
    /// A source passes when every required field has a column.
    pub fn passed(&self) -> bool {
        self.plan.missing_required.is_empty()
    }
}

/// Check `config` against a source header without processing records.
pub fn check_mapping(
    source: &str,
    headers: &[String],
    config: &MappingConfig,
) -> Result<MappingReport, MappingError> {
    let plan = plan_mapping(source, headers, config)?;
    let taken = plan.mapped_fields();
    let suggestions = plan
        .unmapped
        .iter()
        .filter_map(|column| suggest_field(column, |field| !taken.contains(&field)))
        .collect();
    Ok(MappingReport { plan, suggestions })
}

/// Closest canonical field name for `column`, among fields `allowed` accepts.
pub fn suggest_field(column: &str, allowed: impl Fn(Field) -> bool) -> Option<FieldSuggestion> {
    let normalized = normalize_text(column);
    if normalized.is_empty() {
        return None;
    }
    let mut best: Option<FieldSuggestion> = None;
    for field in Field::ALL.iter().copied().filter(|field| allowed(*field)) {
        let name = normalize_text(field.name());
        let score = jaro_similarity(normalized.chars(), name.chars());
        if score < SUGGESTION_THRESHOLD {
            continue;
        }
        if best.as_ref().is_none_or(|current| score > current.score) {
            best = Some(FieldSuggestion {
                column: column.to_string(),
                field,
                score,
            });
        }
    }
    best
}
