//! Validator behaviour against the seed reference tables.

use std::path::PathBuf;

use chrono::NaiveDate;
use jobetl_model::{
    CanonicalRecord, CurrencyCode, DiagnosticKind, DiagnosticLog, DropReason, EducationLevel,
    EmploymentType, Field, PayPeriod, PipelineOptions, RecordId, RemoteOption, SourceRef, Value,
};
use jobetl_standards::ReferenceRegistry;
use jobetl_validate::{SalaryOutcome, Validator, Verdict, check_salary};

fn registry() -> ReferenceRegistry {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../reference");
    ReferenceRegistry::load(&root).expect("load seed reference")
}

fn complete_record(currency: &str) -> CanonicalRecord {
    let mut record = CanonicalRecord::new(
        SourceRef::new("glassdoor", 5),
        RecordId::from_first_16_bytes_of_sha256([9; 32]),
    );
    record.posted_date = Value::Known(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    record.employment_type = Value::Known(EmploymentType::FullTime);
    record.remote_option = Value::Known(RemoteOption::Hybrid);
    record.education_level = Value::Known(EducationLevel::Master);
    record.currency = Value::Known(CurrencyCode::new(currency).unwrap());
    record
}

fn salary(record: &mut CanonicalRecord, min: Option<f64>, max: Option<f64>) {
    record.min_salary = min.into();
    record.max_salary = max.into();
}

#[test]
fn complete_record_passes() {
    let registry = registry();
    let options = PipelineOptions::default();
    let validator = Validator::new(&registry, &options);
    let mut record = complete_record("USD");
    salary(&mut record, Some(120_000.0), Some(140_000.0));

    let mut log = DiagnosticLog::new();
    assert_eq!(validator.validate(&mut record, &mut log), Verdict::Passed);
    assert_eq!(record.min_salary, Value::Known(120_000.0));
    assert_eq!(record.max_salary, Value::Known(140_000.0));
    assert!(log.is_empty());
}

#[test]
fn missing_posted_date_drops_the_record() {
    let registry = registry();
    let options = PipelineOptions::default();
    let mut record = complete_record("USD");
    record.posted_date = Value::NotAvailable;

    let verdict = Validator::new(&registry, &options).validate(&mut record, &mut DiagnosticLog::new());
    assert_eq!(verdict, Verdict::Dropped);
    assert_eq!(record.flags.invalid, vec![DropReason::MissingRequired {
        field: Field::PostedDate
    }]);
}

#[test]
fn sentinel_in_enumerated_required_fields_is_kept() {
    let registry = registry();
    let options = PipelineOptions::default();
    let mut record = complete_record("USD");
    record.employment_type = Value::NotAvailable;
    record.remote_option = Value::NotAvailable;
    record.education_level = Value::NotAvailable;
    record.currency = Value::NotAvailable;

    let verdict = Validator::new(&registry, &options).validate(&mut record, &mut DiagnosticLog::new());
    assert_eq!(verdict, Verdict::Passed);
    assert!(record.flags.invalid.is_empty());
}

#[test]
fn negative_salary_is_reset_and_flagged() {
    let registry = registry();
    let options = PipelineOptions::default();
    let mut record = complete_record("USD");
    salary(&mut record, Some(-90_000.0), Some(-110_000.0));
    let mut log = DiagnosticLog::new();

    let verdict = Validator::new(&registry, &options).validate(&mut record, &mut log);
    assert_eq!(verdict, Verdict::Passed);
    assert!(record.min_salary.is_na() && record.max_salary.is_na());
    assert_eq!(log.entries()[0].detail.as_deref(), Some("non-positive salary"));
}

#[test]
fn hourly_pay_is_annualized_in_its_own_currency() {
    let registry = registry();
    let bounds = PipelineOptions::default().salary_bounds;
    let mut record = complete_record("EUR");
    salary(&mut record, Some(30.0), Some(45.0));

    let outcome = check_salary(&mut record, &registry.currencies, &bounds, &mut DiagnosticLog::new());
    assert_eq!(outcome, SalaryOutcome::Annualized(PayPeriod::Hour));
    assert_eq!(record.min_salary, Value::Known(62_400.0));
    assert_eq!(record.max_salary, Value::Known(93_600.0));
}

#[test]
fn yearly_yen_amounts_are_kept() {
    let registry = registry();
    let bounds = PipelineOptions::default().salary_bounds;
    let mut record = complete_record("JPY");
    salary(&mut record, Some(6_000_000.0), Some(8_000_000.0));

    let outcome = check_salary(&mut record, &registry.currencies, &bounds, &mut DiagnosticLog::new());
    assert_eq!(outcome, SalaryOutcome::Annualized(PayPeriod::Year));
    assert_eq!(record.min_salary, Value::Known(6_000_000.0));
}

#[test]
fn implausible_salary_is_reset_but_record_kept() {
    let registry = registry();
    let options = PipelineOptions::default();
    let validator = Validator::new(&registry, &options);

    for (min, max) in [
        (Some(50_000.0), None),
        (Some(-10.0), Some(20.0)),
        (Some(90_000.0), Some(60_000.0)),
        (Some(2.0), Some(3.0)),
    ] {
        let mut record = complete_record("USD");
        salary(&mut record, min, max);
        let mut log = DiagnosticLog::new();

        assert_eq!(validator.validate(&mut record, &mut log), Verdict::Passed);
        assert!(record.min_salary.is_na() && record.max_salary.is_na());
        assert!(record.flags.soft_flagged.contains(&Field::MinSalary));
        let soft = log.count_by_field(DiagnosticKind::SoftValidationFlag);
        assert_eq!(soft.get(&Field::MinSalary), Some(&1));
        assert_eq!(soft.get(&Field::MaxSalary), Some(&1));
    }
}

#[test]
fn one_sided_salary_logs_the_sentinel_for_the_missing_side() {
    let registry = registry();
    let bounds = PipelineOptions::default().salary_bounds;
    let mut record = complete_record("USD");
    salary(&mut record, None, Some(70_000.0));
    let mut log = DiagnosticLog::new();

    let outcome = check_salary(&mut record, &registry.currencies, &bounds, &mut log);
    assert_eq!(outcome, SalaryOutcome::Rejected("only one salary bound present"));
    let raw: Vec<&str> = log.entries().iter().map(|e| e.raw_value.as_str()).collect();
    assert_eq!(raw, ["__NA__", "70000"]);
}

#[test]
fn experience_outside_bound_is_soft_flagged() {
    let registry = registry();
    let options = PipelineOptions::default().with_max_experience_years(40.0);
    let validator = Validator::new(&registry, &options);

    let mut record = complete_record("USD");
    record.required_exp_years = Value::Known(45.0);
    let mut log = DiagnosticLog::new();
    assert_eq!(validator.validate(&mut record, &mut log), Verdict::Passed);
    assert!(record.required_exp_years.is_na());
    assert_eq!(log.entries()[0].detail.as_deref(), Some("experience above plausible bound"));

    let mut record = complete_record("USD");
    record.required_exp_years = Value::Known(5.0);
    validator.validate(&mut record, &mut log);
    assert_eq!(record.required_exp_years, Value::Known(5.0));
}
