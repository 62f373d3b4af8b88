//! Error types for schema mapping.

use jobetl_model::Field;

/// A mapping configuration that cannot produce the canonical shape.
///
/// Fatal for the source file it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    #[error("source '{source_name}': required field(s) not mapped: {}", field_list(.missing))]
    SchemaMismatch {
        source_name: String,
        missing: Vec<Field>,
    },

    #[error("column '{column}' is mapped to more than one field: {}", .fields.join(", "))]
    AmbiguousColumn { column: String, fields: Vec<String> },

    #[error("column '{column}' is mapped to unknown field '{field}' (line {line})")]
    UnknownField {
        column: String,
        field: String,
        line: usize,
    },

    #[error("column '{column}' mapped to {field} is not present in the source")]
    MappedColumnAbsent { column: String, field: Field },
}

fn field_list(fields: &[Field]) -> String {
    fields
        .iter()
        .map(Field::name)
        .collect::<Vec<_>>()
        .join(", ")
}
