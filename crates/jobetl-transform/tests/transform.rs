//! Extraction, normalization and enrichment against the seed reference tables.

use std::path::PathBuf;

use jobetl_model::{
    CanonicalRecord, CurrencyCode, DiagnosticKind, DiagnosticLog, DropReason, EmploymentType,
    Field, Industry, JobLevel, RawRecord, RecordId, RemoteOption, RoleName, SkillCategory,
    SkillLevel, SourceRef, Value, raw_value,
};
use jobetl_standards::ReferenceRegistry;
use jobetl_transform::{SignalExtractor, enrich_record, match_roles, normalize_record};

fn registry() -> ReferenceRegistry {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../reference");
    ReferenceRegistry::load(&root).expect("load seed reference")
}

fn raw(cells: &[(Field, &str)]) -> RawRecord {
    let mut record = RawRecord::new(
        SourceRef::new("linkedin", 0),
        RecordId::from_first_16_bytes_of_sha256([7; 32]),
    );
    for (field, value) in cells {
        record.set(*field, raw_value(value));
    }
    record
}

/// Extraction, normalization and enrichment in pipeline order.
fn process(registry: &ReferenceRegistry, cells: &[(Field, &str)]) -> (CanonicalRecord, DiagnosticLog) {
    let extractor = SignalExtractor::new(registry).expect("patterns compile");
    let mut log = DiagnosticLog::new();
    let mut record = raw(cells);
    extractor.extract(&mut record);
    let mut canonical = normalize_record(record, registry, &mut log);
    enrich_record(&mut canonical, registry, &mut log);
    (canonical, log)
}

fn known(value: &str) -> Value<String> {
    Value::Known(value.to_string())
}

#[test]
fn description_fills_location_remote_and_salary() {
    let registry = registry();
    let (record, _) = process(&registry, &[
        (Field::JobDescription, "Remote role in Berlin, Germany, 120000-140000 USD"),
        (Field::City, ""),
        (Field::RemoteOption, ""),
        (Field::MinSalary, ""),
        (Field::MaxSalary, ""),
    ]);

    assert_eq!(record.city, known("Berlin"));
    assert_eq!(record.country, known("Germany"));
    assert_eq!(record.remote_option, Value::Known(RemoteOption::Remote));
    assert_eq!(record.min_salary, Value::Known(120_000.0));
    assert_eq!(record.max_salary, Value::Known(140_000.0));
    assert_eq!(record.currency, Value::Known(CurrencyCode::new("USD").unwrap()));
    assert_eq!(record.country_iso, known("DE"));
    assert!(record.flags.extracted.contains(&Field::City));
    assert!(record.flags.extracted.contains(&Field::MinSalary));
    assert!(record.flags.enriched.contains(&Field::Population));

    let signals = format!(
        "{}, {} ({}) | {} | {}-{} {}",
        record.city,
        record.country,
        record.country_iso,
        record.remote_option,
        record.min_salary,
        record.max_salary,
        record.currency,
    );
    insta::assert_snapshot!(signals, @"Berlin, Germany (DE) | Remote | 120000-140000 USD");
}

#[test]
fn negative_structured_salary_keeps_its_sign() {
    let registry = registry();
    let (record, log) = process(&registry, &[
        (Field::MinSalary, "-90000"),
        (Field::MaxSalary, "-110,000"),
        (Field::Currency, "USD"),
    ]);

    assert_eq!(record.min_salary, Value::Known(-90_000.0));
    assert_eq!(record.max_salary, Value::Known(-110_000.0));
    assert!(log.is_empty());
}

#[test]
fn unknown_industry_becomes_sentinel_with_one_diagnostic() {
    let registry = registry();
    let (record, log) = process(&registry, &[
        (Field::Industry, "Widgetmaking"),
        (Field::PostedDate, "2024-01-15"),
    ]);

    assert_eq!(record.industry, Value::NotAvailable);
    assert_eq!(log.len(), 1);
    let entry = &log.entries()[0];
    assert_eq!(entry.field, Field::Industry);
    assert_eq!(entry.raw_value, "Widgetmaking");
    assert_eq!(entry.source, "linkedin");
    assert_eq!(entry.kind, DiagnosticKind::UnmatchedReference);
}

#[test]
fn extraction_never_overwrites_present_values() {
    let registry = registry();
    let (record, _) = process(&registry, &[
        (Field::City, "Hamburg"),
        (Field::RemoteOption, "on-site"),
        (Field::JobDescription, "Hybrid team in Berlin, 3-5 years of Python"),
    ]);

    assert_eq!(record.city, known("Hamburg"));
    assert_eq!(record.country, known("Germany"));
    assert_eq!(record.remote_option, Value::Known(RemoteOption::Onsite));
    assert_eq!(record.required_exp_years, Value::Known(3.0));
    assert!(!record.flags.extracted.contains(&Field::City));
}

#[test]
fn funding_amounts_are_not_read_as_salary() {
    let registry = registry();
    let extractor = SignalExtractor::new(&registry).expect("patterns compile");
    assert_eq!(
        extractor.salary("We raised $20,000,000-$30,000,000 in funding last year."),
        None
    );
    assert_eq!(extractor.salary("Series B startup, ARR of $5,000,000"), None);
    assert_eq!(extractor.salary("Great office, 120 desks and €500 of snacks"), None);
}

#[test]
fn single_amount_needs_a_salary_word() {
    let registry = registry();
    let extractor = SignalExtractor::new(&registry).expect("patterns compile");

    let signal = extractor
        .salary("Competitive salary of €65k per year")
        .expect("salary found");
    assert_eq!(signal.min, 65_000.0);
    assert_eq!(signal.max, 65_000.0);
    assert_eq!(signal.currency.as_str(), "EUR");

    let range = extractor
        .salary("Pay: £45,000 - £55,000 depending on experience")
        .expect("range found");
    assert_eq!((range.min, range.max), (45_000.0, 55_000.0));
    assert_eq!(range.currency.as_str(), "GBP");

    let short = extractor.salary("$80-100k").expect("range with shared suffix");
    assert_eq!((short.min, short.max), (80_000.0, 100_000.0));
}

#[test]
fn remote_keywords_follow_table_order() {
    let registry = registry();
    let (record, _) = process(&registry, &[(
        Field::JobDescription,
        "Hybrid setup, remote days possible",
    )]);
    assert_eq!(record.remote_option, Value::Known(RemoteOption::Hybrid));
}

#[test]
fn salary_in_another_currency_is_left_alone() {
    let registry = registry();
    let (record, _) = process(&registry, &[
        (Field::Currency, "EUR"),
        (Field::JobDescription, "Base salary 90000-110000 USD"),
    ]);
    assert!(record.min_salary.is_na());
    assert_eq!(record.currency, Value::Known(CurrencyCode::new("EUR").unwrap()));
}

#[test]
fn categorical_aliases_and_codes_normalize() {
    let registry = registry();
    let (record, log) = process(&registry, &[
        (Field::EmploymentType, "full time"),
        (Field::RemoteOption, "false"),
        (Field::RequiredExpYears, "SE"),
        (Field::PostedDate, "15/01/2024"),
        (Field::Industry, "Real Estate"),
        (Field::Population, "3,600,000"),
    ]);

    assert_eq!(record.employment_type, Value::Known(EmploymentType::FullTime));
    assert_eq!(record.remote_option, Value::NotAvailable);
    assert_eq!(record.required_exp_years, Value::Known(5.0));
    assert_eq!(record.industry, Value::Known(Industry::RealEstate));
    assert_eq!(record.population, Value::Known(3_600_000));
    assert_eq!(
        record.posted_date.known().map(ToString::to_string).as_deref(),
        Some("2024-01-15")
    );
    assert!(log.is_empty(), "unexpected diagnostics: {:?}", log.entries());
}

#[test]
fn unparseable_posted_date_marks_record_invalid() {
    let registry = registry();
    let (record, log) = process(&registry, &[(Field::PostedDate, "someday soon")]);

    assert!(record.posted_date.is_na());
    assert_eq!(record.flags.invalid, vec![DropReason::UnparseableDate {
        raw: "someday soon".to_string()
    }]);
    assert_eq!(log.entries()[0].kind, DiagnosticKind::Unparseable);
}

#[test]
fn skills_resolve_and_pick_up_reference_attributes() {
    let registry = registry();
    let (record, log) = process(&registry, &[(Field::SkillName, "Python; sql, Unobtainium")]);

    let names: Vec<&str> = record.skills.keys().map(String::as_str).collect();
    assert_eq!(names, ["Python", "SQL"]);
    let sql = record.skills["SQL"];
    assert_eq!(sql.category, Value::Known(SkillCategory::Database));
    assert_eq!(sql.level, Value::Known(SkillLevel::Intermediate));
    assert_eq!(record.skills["Python"].level, Value::NotAvailable);

    assert_eq!(log.len(), 1);
    assert_eq!(log.entries()[0].field, Field::SkillName);
    assert_eq!(log.entries()[0].raw_value, "Unobtainium");
}

#[test]
fn supplied_skill_attributes_win_over_reference() {
    let registry = registry();
    let (record, _) = process(&registry, &[
        (Field::SkillName, "SQL"),
        (Field::SkillLevelRequired, "Expert"),
    ]);
    let sql = record.skills["SQL"];
    assert_eq!(sql.level, Value::Known(SkillLevel::Expert));
    assert_eq!(sql.category, Value::Known(SkillCategory::Database));
}

#[test]
fn role_titles_map_onto_the_taxonomy() {
    let registry = registry();
    let roles = |title: &str| -> Vec<RoleName> {
        match_roles(title, &registry.roles).into_iter().collect()
    };

    assert_eq!(roles("Senior Data Engineer (m/w/d)"), [RoleName::DataEngineer]);
    assert_eq!(roles("Business Intelligence Developer"), [RoleName::BiDeveloper]);
    assert_eq!(roles("Head of Data"), [RoleName::DataLead]);
    assert_eq!(roles("Chief Data Officer"), [RoleName::DataManager]);
    assert_eq!(roles("Chief Data & AI Officer"), [RoleName::DataLead]);
    assert_eq!(roles("Marketing Analytics Analyst"), [RoleName::DataAnalyst]);
    assert!(roles("Data Center Technician Lead").is_empty());
    assert!(roles("Barista").is_empty());
}

#[test]
fn title_enrichment_fills_roles_and_levels() {
    let registry = registry();
    let (record, log) = process(&registry, &[(Field::RoleName, "Senior Data Engineer")]);
    assert_eq!(record.roles.iter().copied().collect::<Vec<_>>(), [RoleName::DataEngineer]);
    assert_eq!(record.levels.iter().copied().collect::<Vec<_>>(), [JobLevel::Senior]);
    assert!(log.is_empty());

    let (record, log) = process(&registry, &[(Field::RoleName, "Barista")]);
    assert!(record.roles.is_empty());
    assert_eq!(log.entries()[0].field, Field::RoleName);
}

#[test]
fn ambiguous_city_leaves_country_unknown() {
    let registry = registry();
    let (record, log) = process(&registry, &[(Field::City, "cambridge")]);
    assert_eq!(record.city, known("Cambridge"));
    assert!(record.country.is_na());
    assert_eq!(log.entries()[0].field, Field::Country);

    let (record, _) = process(&registry, &[(Field::City, "München")]);
    assert_eq!(record.city, known("Munich"));
    assert_eq!(record.country, known("Germany"));
    assert_eq!(record.latitude.known().map(|c| c.degrees()), Some(51.1657));
}

mod monotonic_fill {
    use proptest::prelude::*;

    use std::sync::LazyLock;

    use super::{CanonicalRecord, DiagnosticLog, RecordId, SourceRef, Value, enrich_record, registry};
    use jobetl_model::{Coordinate, Field};
    use jobetl_standards::ReferenceRegistry;

    static REGISTRY: LazyLock<ReferenceRegistry> = LazyLock::new(registry);

    fn text_value() -> impl Strategy<Value = Value<String>> {
        prop_oneof![
            Just(Value::NotAvailable),
            prop::sample::select(vec!["Berlin", "Cambridge", "Paris", "Atlantis", "Hanoi"])
                .prop_map(|s| Value::Known(s.to_string())),
        ]
    }

    fn country_value() -> impl Strategy<Value = Value<String>> {
        prop_oneof![
            Just(Value::NotAvailable),
            prop::sample::select(vec!["Germany", "France", "Vietnam", "Narnia"])
                .prop_map(|s| Value::Known(s.to_string())),
        ]
    }

    proptest! {
        #[test]
        fn enrichment_never_changes_known_values(
            city in text_value(),
            country in country_value(),
            iso in prop_oneof![Just(Value::NotAvailable), Just(Value::Known("XX".to_string()))],
            latitude in prop::option::of(-90.0f64..90.0),
            population in prop::option::of(0u64..1_000_000_000),
        ) {
            let mut record = CanonicalRecord::new(
                SourceRef::new("prop", 0),
                RecordId::from_first_16_bytes_of_sha256([0; 32]),
            );
            record.city = city;
            record.country = country;
            record.country_iso = iso;
            record.latitude = latitude.and_then(Coordinate::new).into();
            record.population = population.into();
            let before = record.clone();

            let filled = enrich_record(&mut record, &REGISTRY, &mut DiagnosticLog::new());

            for field in [Field::City, Field::Country, Field::CountryIso, Field::Latitude, Field::Population] {
                if !before.is_na(field) {
                    prop_assert!(!filled.contains(&field));
                }
            }
            if before.city.is_known() { prop_assert_eq!(&record.city, &before.city); }
            if before.country.is_known() { prop_assert_eq!(&record.country, &before.country); }
            if before.country_iso.is_known() { prop_assert_eq!(&record.country_iso, &before.country_iso); }
            if before.latitude.is_known() { prop_assert_eq!(record.latitude, before.latitude); }
            if before.population.is_known() { prop_assert_eq!(record.population, before.population); }
        }
    }
}
