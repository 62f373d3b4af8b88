//! Canonical data model for the job-posting pipeline.

pub mod diagnostic;
pub mod entities;
pub mod enums;
pub mod error;
pub mod field;
pub mod ids;
pub mod options;
pub mod record;
pub mod summary;
pub mod value;

pub use diagnostic::{DiagnosticEntry, DiagnosticKind, DiagnosticLog};
pub use entities::{
    CompanyRow, DecomposedTables, JobLevelRow, JobPostingRow, JobRoleRow, JobSkillRow,
    LocationRow, RoleRow, SkillRow, SurrogateId,
};
pub use enums::{
    CompanySize, EducationLevel, EmploymentType, Enumerated, Industry, JobLevel, RemoteOption,
    RoleName, SkillCategory, SkillLevel,
};
pub use error::{ModelError, Result};
pub use field::{Field, FieldKind, UNUSED_MARKER};
pub use ids::{Coordinate, CurrencyCode, RecordId};
pub use options::{MatchingMode, PayPeriod, PipelineOptions, SalaryBounds};
pub use record::{CanonicalRecord, DropReason, RawRecord, RecordFlags, SkillEntry, SourceRef};
pub use summary::{DroppedRecord, FileFailure, RunSummary, SourceSummary};
pub use value::{NOT_AVAILABLE, Value, raw_value};
