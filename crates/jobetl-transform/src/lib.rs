//! Per-record transformation stages: signal extraction, normalization and
//! enrichment.
//!
//! Stages run in that order on one record at a time and only read the shared
//! [`jobetl_standards::ReferenceRegistry`]. Unmatched values are appended to
//! the caller's [`jobetl_model::DiagnosticLog`].

pub mod enrich;
pub mod error;
pub mod extract;
pub mod normalization;
pub mod normalize;
pub mod roles;

pub use enrich::enrich_record;
pub use error::{Result, TransformError};
pub use extract::{SalarySignal, SignalExtractor, experience_years};
pub use normalize::normalize_record;
pub use roles::match_roles;
