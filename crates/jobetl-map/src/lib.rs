//! Schema mapping: source columns to canonical fields.

pub mod error;
pub mod mapper;
pub mod plan;
pub mod report;

pub use error::MappingError;
pub use mapper::{MULTI_VALUE_SEPARATOR, MappedBatch, apply_mapping};
pub use plan::{ColumnBinding, SchemaPlan, plan_mapping};
pub use report::{FieldSuggestion, MappingReport, check_mapping, suggest_field};
