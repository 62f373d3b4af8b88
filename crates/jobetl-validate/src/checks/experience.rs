use jobetl_model::{CanonicalRecord, DiagnosticLog, Field};

/// Reset experience outside `0..=max_years`.
pub fn check_experience(record: &mut CanonicalRecord, max_years: f64, log: &mut DiagnosticLog) {
    let Some(&years) = record.required_exp_years.known() else {
        return;
    };
    let detail = if years < 0.0 {
        "negative experience"
    } else if years > max_years {
        "experience above plausible bound"
    } else {
        return;
    };
    log.soft_flag(
        Field::RequiredExpYears,
        &years.to_string(),
        &record.lineage,
        detail,
    );
    record.required_exp_years.reset();
    record.flags.soft_flagged.insert(Field::RequiredExpYears);
}
