//! Command tests against the seed reference tables.

use std::fs;
use std::path::{Path, PathBuf};

use jobetl_cli::cli::{CheckMappingArgs, RunArgs};
use jobetl_cli::commands::{load_references, run_check_mapping, run_pipeline, run_references};
use jobetl_model::{
    CompanySize, EducationLevel, EmploymentType, Enumerated, Industry, JobLevel, MatchingMode,
    NOT_AVAILABLE, RemoteOption, RoleName, SkillCategory, SkillLevel,
};

fn reference_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../reference")
}

fn run_args(input_dir: &Path) -> RunArgs {
    RunArgs {
        input_dir: input_dir.to_path_buf(),
        output_dir: None,
        dry_run: false,
        strict: false,
        max_experience_years: None,
        sequential: true,
    }
}

fn write_board(dir: &Path) {
    fs::write(
        dir.join("board.csv"),
        "id,created,contract,workplace,degree,currency,title,company,industry
A-1,2024-03-01,full time,Remote,Master,EUR,Senior Data Engineer,Acme Inc,Widgetmaking
A-2,,full time,Remote,Master,EUR,Data Analyst,Acme Inc,tech
",
    )
    .unwrap();
    fs::write(
        dir.join("board.mapping.csv"),
        "raw_column,canonical_field
id,__source_id
created,posted_date
contract,employment_type
workplace,remote_option
degree,education_level
currency,currency
title,role_name
company,company_name
industry,industry
",
    )
    .unwrap();
}

#[test]
fn run_writes_tables_and_reports() {
    let dir = tempfile::tempdir().unwrap();
    write_board(dir.path());

    let result = run_pipeline(&run_args(dir.path()), Some(&reference_dir())).unwrap();
    assert!(!result.has_errors());

    let summary = &result.output.summary;
    assert_eq!(summary.records_in, 2);
    assert_eq!(summary.records_dropped, 1);
    assert_eq!(summary.dropped[0].source_id.as_deref(), Some("A-2"));

    let out = dir.path().join("output");
    let unmatched = fs::read_to_string(out.join("unmatched_values.csv")).unwrap();
    assert!(unmatched.contains("industry,Widgetmaking,board,0,unmatched_reference,"));
    let companies = fs::read_to_string(out.join("companies.csv")).unwrap();
    assert!(companies.contains("Acme Inc,__NA__,__NA__"));
    let dropped = fs::read_to_string(out.join("dropped_records.csv")).unwrap();
    assert!(dropped.contains("board,1,A-2,"));
}

fn write_mixed_board(dir: &Path) {
    fs::write(
        dir.join("mixed.csv"),
        "created,contract,workplace,degree,currency,salary_min,salary_max,title,company,size,industry,skills,description
2024-03-01,full time,,,,,,,Acme Inc,startup,tech,,\"Remote role in Berlin, Germany, 120000-140000 USD\"
2024-03-02,gig,false,Bachelor,EUR,50000,60000,Senior Data Analyst,Beta GmbH,huge,Widgetmaking,SQL; Unobtainium,
2024-03-03,full time,Onsite,Master,USD,-90000,-110000,Junior Data Engineer,Gamma Ltd,,,Python; Java,Hybrid team in Hamburg
2024-03-04,part time,Hybrid,phd,yen,,,Intern,Delta AG,1-10,,,
",
    )
    .unwrap();
    fs::write(
        dir.join("mixed.mapping.csv"),
        "raw_column,canonical_field
created,posted_date
contract,employment_type
workplace,remote_option
degree,education_level
currency,currency
salary_min,min_salary
salary_max,max_salary
title,role_name
company,company_name
size,company_size
industry,industry
skills,skill_name
description,job_description
",
    )
    .unwrap();
}

fn labels<E: Enumerated>() -> Vec<&'static str> {
    E::all().iter().map(Enumerated::as_str).collect()
}

/// Every value of `column` in the written `table` is one of `allowed` or the sentinel.
fn assert_closed(out: &Path, table: &str, column: &str, allowed: &[&str]) -> usize {
    let mut reader = csv::Reader::from_path(out.join(format!("{table}.csv"))).unwrap();
    let index = reader
        .headers()
        .unwrap()
        .iter()
        .position(|header| header == column)
        .unwrap_or_else(|| panic!("{table} has no {column} column"));
    let mut rows = 0;
    for record in reader.records() {
        let value = record.unwrap()[index].to_string();
        assert!(
            value == NOT_AVAILABLE || allowed.contains(&value.as_str()),
            "{table}.{column} holds {value:?}"
        );
        rows += 1;
    }
    rows
}

#[test]
fn written_enumerated_columns_stay_closed() {
    let dir = tempfile::tempdir().unwrap();
    write_mixed_board(dir.path());

    let result = run_pipeline(&run_args(dir.path()), Some(&reference_dir())).unwrap();
    assert_eq!(result.output.summary.records_dropped, 0);
    let out = dir.path().join("output");

    let registry = load_references(Some(&reference_dir()), MatchingMode::Lenient).unwrap();
    let currencies: Vec<String> = registry
        .currencies
        .spellings()
        .map(|(_, code)| code.to_string())
        .collect();
    let currencies: Vec<&str> = currencies.iter().map(String::as_str).collect();

    assert_eq!(assert_closed(&out, "companies", "size", &labels::<CompanySize>()), 4);
    assert_closed(&out, "companies", "industry", &labels::<Industry>());
    assert_closed(&out, "skills", "skill_category", &labels::<SkillCategory>());
    assert_closed(&out, "role_names", "role_name", &labels::<RoleName>());
    assert_eq!(assert_closed(&out, "job_postings", "currency", &currencies), 4);
    assert_closed(&out, "job_postings", "education_level", &labels::<EducationLevel>());
    assert_closed(&out, "job_postings", "employment_type", &labels::<EmploymentType>());
    assert_closed(&out, "job_postings", "remote_option", &labels::<RemoteOption>());
    assert_closed(&out, "job_skills", "skill_level_required", &labels::<SkillLevel>());
    assert_closed(&out, "job_levels", "level", &labels::<JobLevel>());
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_board(dir.path());
    let args = RunArgs {
        dry_run: true,
        ..run_args(dir.path())
    };
    let result = run_pipeline(&args, Some(&reference_dir())).unwrap();
    assert!(result.written.is_none());
    assert!(!dir.path().join("output").exists());
}

#[test]
fn empty_input_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let error = run_pipeline(&run_args(dir.path()), Some(&reference_dir())).unwrap_err();
    assert!(error.to_string().contains("no source files"));
}

#[test]
fn missing_reference_dir_halts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    write_board(dir.path());
    let missing = dir.path().join("no-such-reference");
    let error = run_pipeline(&run_args(dir.path()), Some(&missing)).unwrap_err();
    assert!(format!("{error:#}").contains("load reference tables"));
    assert!(!dir.path().join("output").exists());
}

#[test]
fn check_mapping_passes_for_complete_mapping() {
    let dir = tempfile::tempdir().unwrap();
    write_board(dir.path());
    let report = run_check_mapping(&CheckMappingArgs {
        source: dir.path().join("board.csv"),
        mapping: None,
    })
    .unwrap();
    assert!(report.passed());
    assert!(report.plan.unmapped.is_empty());
}

#[test]
fn references_lists_every_manifest_role() {
    let files = run_references(Some(&reference_dir())).unwrap();
    let roles: Vec<&str> = files.iter().map(|file| file.role.as_str()).collect();
    assert!(roles.contains(&"industry"));
    assert!(roles.contains(&"signal_keyword"));
    assert!(files.iter().all(|file| file.sha256.len() == 64));
}
