use jobetl_model::{CanonicalRecord, DiagnosticLog, PipelineOptions};
use jobetl_standards::ReferenceRegistry;
use tracing::debug;

use crate::checks::{SalaryOutcome, check_experience, check_required, check_salary};

/// Pass/fail decision for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Goes to the combiner, possibly with soft-flagged fields reset.
    Passed,
    /// Excluded from the fact table; reasons are in `record.flags.invalid`.
    Dropped,
}

/// Runs every check against records of one run.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    registry: &'a ReferenceRegistry,
    options: &'a PipelineOptions,
}

impl<'a> Validator<'a> {
    pub fn new(registry: &'a ReferenceRegistry, options: &'a PipelineOptions) -> Self {
        Self { registry, options }
    }

    pub fn validate(&self, record: &mut CanonicalRecord, log: &mut DiagnosticLog) -> Verdict {
        let salary = check_salary(
            record,
            &self.registry.currencies,
            &self.options.salary_bounds,
            log,
        );
        if let SalaryOutcome::Rejected(detail) = salary {
            debug!(source = %record.lineage.source, row = record.lineage.row, detail, "salary reset");
        }
        check_experience(record, self.options.max_experience_years, log);
        check_required(record);

        if record.flags.is_invalid() {
            debug!(
                source = %record.lineage.source,
                row = record.lineage.row,
                reasons = record.flags.invalid.len(),
                "record dropped"
            );
            Verdict::Dropped
        } else {
            Verdict::Passed
        }
    }
}
