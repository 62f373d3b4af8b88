//! Output writer tests over a temporary directory.

use std::fs;

use chrono::NaiveDate;
use jobetl_model::{
    CompanyRow, CompanySize, DecomposedTables, DiagnosticLog, DropReason, DroppedRecord, Field,
    Industry, JobPostingRow, LocationRow, RecordId, RunSummary, SourceRef, Value,
};
use jobetl_output::{OutputTable, write_outputs};

fn tables() -> DecomposedTables {
    DecomposedTables {
        companies: vec![
            CompanyRow {
                company_id: 1,
                company_name: Value::Known("Acme Inc".to_string()),
                size: Value::Known(CompanySize::Large),
                industry: Value::Known(Industry::Technology),
            },
            CompanyRow {
                company_id: 2,
                company_name: Value::Known("Beta GmbH".to_string()),
                size: Value::NotAvailable,
                industry: Value::NotAvailable,
            },
        ],
        locations: vec![LocationRow {
            location_id: 1,
            city: Value::Known("Berlin".to_string()),
            country: Value::Known("Germany".to_string()),
            country_iso: Value::Known("DE".to_string()),
            latitude: Value::NotAvailable,
            longitude: Value::NotAvailable,
            population: Value::NotAvailable,
        }],
        job_postings: vec![JobPostingRow {
            job_id: 1,
            company_id: 1,
            location_id: 1,
            posted_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            min_salary: Value::NotAvailable,
            max_salary: Value::NotAvailable,
            currency: Value::NotAvailable,
            required_exp_years: Value::NotAvailable,
            education_level: Value::NotAvailable,
            employment_type: Value::NotAvailable,
            remote_option: Value::NotAvailable,
            job_description: Value::NotAvailable,
        }],
        lineage: vec![SourceRef::new("board", 0)],
        ..DecomposedTables::default()
    }
}

#[test]
fn writes_every_artefact_in_load_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut log = DiagnosticLog::new();
    log.unmatched(Field::Industry, "Widgetmaking", &SourceRef::new("board", 3));
    let summary = RunSummary {
        records_in: 2,
        records_passed: 1,
        records_dropped: 1,
        dropped: vec![DroppedRecord {
            source: "board".to_string(),
            row: 1,
            source_id: Some("B-1".to_string()),
            record_id: RecordId::from_first_16_bytes_of_sha256([0xab; 32]),
            reasons: vec![DropReason::MissingRequired {
                field: Field::PostedDate,
            }],
        }],
        ..RunSummary::default()
    };

    let paths = write_outputs(&dir.path().join("out"), &tables(), &log, &summary).unwrap();

    let names: Vec<_> = paths
        .tables
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    let expected: Vec<_> = OutputTable::LOAD_ORDER.iter().map(|t| t.file_name()).collect();
    assert_eq!(names, expected);
    assert!(paths.all().all(|path| path.is_file()));

    let companies = fs::read_to_string(&paths.tables[0]).unwrap();
    insta::assert_snapshot!(companies.trim_end(), @r"
    company_id,company_name,size,industry
    1,Acme Inc,Large,Technology
    2,Beta GmbH,__NA__,__NA__
    ");

    let unmatched = fs::read_to_string(&paths.unmatched_values).unwrap();
    insta::assert_snapshot!(unmatched.trim_end(), @r"
    field,raw_value,source,row,kind,detail
    industry,Widgetmaking,board,3,unmatched_reference,
    ");

    let dropped = fs::read_to_string(&paths.dropped_records).unwrap();
    let line = dropped.lines().nth(1).unwrap();
    assert!(line.starts_with("board,1,B-1,abababab"));
    assert!(line.ends_with(",missing required posted_date"));
}

#[test]
fn empty_bridges_still_get_a_header() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_outputs(
        dir.path(),
        &tables(),
        &DiagnosticLog::new(),
        &RunSummary::default(),
    )
    .unwrap();
    let job_skills = fs::read_to_string(dir.path().join("job_skills.csv")).unwrap();
    assert_eq!(job_skills.trim_end(), "job_id,skill_id,skill_level_required");

    let postings = fs::read_to_string(dir.path().join("job_postings.csv")).unwrap();
    let row = postings.lines().nth(1).unwrap();
    assert!(row.starts_with("1,1,1,2024-03-01,,,__NA__,,__NA__"));
    assert_eq!(paths.tables.len(), 8);
}

#[test]
fn summary_json_shape() {
    let summary = RunSummary::default();
    insta::assert_json_snapshot!(summary, @r#"
    {
      "records_in": 0,
      "records_passed": 0,
      "records_dropped": 0,
      "sources": [],
      "dropped": [],
      "unmatched_by_field": {},
      "soft_flags_by_field": {},
      "file_failures": []
    }
    "#);
}
