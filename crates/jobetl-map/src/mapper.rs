//! Schema mapper: raw source rows to canonical-field-aligned records.

use std::time::Instant;

use jobetl_ingest::{CsvTable, MappingConfig, derive_record_id};
use jobetl_model::{Field, FieldKind, RawRecord, SourceRef, Value, raw_value};
use tracing::{info, info_span, warn};

use crate::error::MappingError;
use crate::plan::{SchemaPlan, plan_mapping};

/// Separator used when several columns feed one multi-valued field.
pub const MULTI_VALUE_SEPARATOR: &str = "|";

/// Records of one source, aligned to canonical field names.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedBatch {
    pub source: String,
    pub records: Vec<RawRecord>,
    pub plan: SchemaPlan,
}

/// Map every row of `table` onto canonical fields.
///
/// Fails with [`MappingError::SchemaMismatch`] before touching any row when a
/// required field has no column. Unmapped columns are dropped with a warning.
pub fn apply_mapping(
    source: &str,
    table: &CsvTable,
    config: &MappingConfig,
) -> Result<MappedBatch, MappingError> {
    let span = info_span!("map", source = %source);
    let _guard = span.enter();
    let start = Instant::now();

    let plan = plan_mapping(source, &table.headers, config)?;
    plan.ensure_required()?;

    if !plan.unmapped.is_empty() {
        warn!(
            source = %source,
            columns = ?plan.unmapped,
            "dropping columns without a mapping"
        );
    }

    let records = table
        .rows
        .iter()
        .enumerate()
        .map(|(row, cells)| map_row(source, row, cells, &plan))
        .collect::<Vec<_>>();

    info!(
        source = %source,
        records = records.len(),
        fields = plan.bindings.len(),
        duration_ms = start.elapsed().as_millis(),
        "schema mapping complete"
    );

    Ok(MappedBatch {
        source: source.to_string(),
        records,
        plan,
    })
}

fn map_row(source: &str, row: usize, cells: &[String], plan: &SchemaPlan) -> RawRecord {
    let id = derive_record_id(source, row, cells);
    let mut lineage = SourceRef::new(source, row);

    let mut record = RawRecord::new(lineage.clone(), id);
    for binding in &plan.bindings {
        let cell = cells.get(binding.index).map(String::as_str).unwrap_or_default();
        let Value::Known(value) = raw_value(cell) else {
            continue;
        };
        merge_cell(&mut record, binding.field, value);
    }

    if let Some(source_id) = record.text(Field::SourceId) {
        lineage.source_id = Some(source_id.to_string());
        record.lineage = lineage;
    }
    record
}

/// First non-empty column wins for single-valued fields; multi-valued
/// fields collect every column.
fn merge_cell(record: &mut RawRecord, field: Field, value: String) {
    let merged = match (record.get(field), field.kind()) {
        (Value::NotAvailable, _) => value,
        (Value::Known(existing), FieldKind::MultiValued) => {
            format!("{existing}{MULTI_VALUE_SEPARATOR}{value}")
        }
        (Value::Known(_), _) => return,
    };
    record.set(field, Value::Known(merged));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> CsvTable {
        CsvTable {
            headers: headers.iter().map(ToString::to_string).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(ToString::to_string).collect())
                .collect(),
        }
    }

    fn required_pairs() -> Vec<(&'static str, &'static str)> {
        vec![
            ("date", "posted_date"),
            ("contract", "employment_type"),
            ("remote", "remote_option"),
            ("degree", "education_level"),
            ("cur", "currency"),
        ]
    }

    #[test]
    fn multi_valued_columns_are_joined() {
        let mut pairs = required_pairs();
        pairs.push(("skills_a", "skill_name"));
        pairs.push(("skills_b", "skill_name"));
        pairs.push(("city_1", "city"));
        pairs.push(("city_2", "city"));
        let config = MappingConfig::from_pairs(pairs);
        let table = table(
            &[
                "date", "contract", "remote", "degree", "cur", "skills_a", "skills_b", "city_1",
                "city_2",
            ],
            &[&["2024-01-01", "FT", "", "", "", "SQL", "Python", "", "Berlin"]],
        );

        let batch = apply_mapping("adzuna", &table, &config).expect("map");
        let record = &batch.records[0];
        assert_eq!(record.text(Field::SkillName), Some("SQL|Python"));
        assert_eq!(record.text(Field::City), Some("Berlin"));
        assert_eq!(record.get(Field::RemoteOption), &Value::NotAvailable);
    }

    #[test]
    fn source_id_is_kept_for_lineage() {
        let mut pairs = required_pairs();
        pairs.push(("id", "__source_id"));
        let config = MappingConfig::from_pairs(pairs);
        let table = table(
            &["id", "date", "contract", "remote", "degree", "cur"],
            &[&["A-17", "2024-01-01", "", "", "", ""]],
        );

        let batch = apply_mapping("adzuna", &table, &config).expect("map");
        let lineage = &batch.records[0].lineage;
        assert_eq!(lineage.source, "adzuna");
        assert_eq!(lineage.row, 0);
        assert_eq!(lineage.source_id.as_deref(), Some("A-17"));
    }
}
