//! Rule-based canonicalization of a mapped record.
//!
//! Every categorical value goes through its reference table. A value the
//! table does not know becomes the sentinel plus an `unmatched_reference`
//! diagnostic; raw text is never passed through into an enumerated field.

use jobetl_model::{
    CanonicalRecord, Coordinate, DiagnosticLog, DropReason, Enumerated, Field, RawRecord,
    SkillEntry, Value,
};
use jobetl_standards::{AliasTable, ReferenceRegistry};

use crate::extract::experience_years;
use crate::normalization::{parse_amount, parse_count, parse_f64, parse_posted_date};

/// Separators accepted inside a multi-valued cell.
const LIST_SEPARATORS: &[char] = &['|', ';', ','];

/// Typed record from a mapped (and signal-extracted) raw record.
pub fn normalize_record(
    raw: RawRecord,
    registry: &ReferenceRegistry,
    log: &mut DiagnosticLog,
) -> CanonicalRecord {
    let mut ctx = Normalizer {
        raw: &raw,
        registry,
        log,
    };
    let mut record = CanonicalRecord::new(raw.lineage.clone(), raw.id);

    record.company_name = ctx.text(Field::CompanyName);
    record.company_size = ctx.enumerated(&registry.company_sizes, Field::CompanySize);
    record.industry = ctx.enumerated(&registry.industries, Field::Industry);

    record.city = ctx.canonical(Field::City);
    record.country = ctx.canonical(Field::Country);
    record.country_iso = ctx.canonical(Field::CountryIso);
    record.latitude = ctx.coordinate(Field::Latitude, 90.0);
    record.longitude = ctx.coordinate(Field::Longitude, 180.0);
    record.population = ctx.parsed(Field::Population, parse_count);

    record.min_salary = ctx.parsed(Field::MinSalary, parse_amount);
    record.max_salary = ctx.parsed(Field::MaxSalary, parse_amount);
    record.currency = match raw.text(Field::Currency) {
        None => Value::NotAvailable,
        Some(text) => match registry.currencies.resolve(text, registry.mode()) {
            Some(code) => code.clone(),
            None => {
                ctx.log.unmatched(Field::Currency, text, &raw.lineage);
                Value::NotAvailable
            }
        },
    };
    record.required_exp_years = ctx.experience();

    record.education_level = ctx.enumerated(&registry.education_levels, Field::EducationLevel);
    record.employment_type = ctx.enumerated(&registry.employment_types, Field::EmploymentType);
    record.remote_option = ctx.enumerated(&registry.remote_options, Field::RemoteOption);
    record.job_description = ctx.text(Field::JobDescription);
    record.role_title = ctx.text(Field::RoleName);

    if let Some(cell) = raw.text(Field::JobLevel) {
        for part in list_items(cell) {
            if let Value::Known(level) = ctx.lookup(&registry.job_levels, Field::JobLevel, part) {
                record.levels.insert(level);
            }
        }
    }

    if let Some(cell) = raw.text(Field::SkillName) {
        let supplied = SkillEntry {
            category: ctx.enumerated(&registry.skill_categories, Field::SkillCategory),
            level: ctx.enumerated(&registry.skill_levels, Field::SkillLevelRequired),
        };
        for part in list_items(cell) {
            match registry.skills.resolve(part, registry.mode()) {
                Some(skill) => {
                    record.skills.entry(skill.name.clone()).or_insert(supplied);
                }
                None => ctx.log.unmatched(Field::SkillName, part, &raw.lineage),
            }
        }
    }

    record.posted_date = match raw.text(Field::PostedDate) {
        None => Value::NotAvailable,
        Some(text) => match parse_posted_date(text) {
            Some(date) => Value::Known(date),
            None => {
                ctx.log.unparseable(Field::PostedDate, text, &raw.lineage);
                record.flags.mark_invalid(DropReason::UnparseableDate {
                    raw: text.to_string(),
                });
                Value::NotAvailable
            }
        },
    };

    record.flags.extracted = raw.flags.extracted;
    record
}

fn list_items(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(LIST_SEPARATORS)
        .map(str::trim)
        .filter(|item| !item.is_empty())
}

struct Normalizer<'a> {
    raw: &'a RawRecord,
    registry: &'a ReferenceRegistry,
    log: &'a mut DiagnosticLog,
}

impl Normalizer<'_> {
    fn text(&self, field: Field) -> Value<String> {
        self.raw
            .text(field)
            .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
            .into()
    }

    fn enumerated<E: Enumerated>(&mut self, table: &AliasTable<E>, field: Field) -> Value<E> {
        match self.raw.text(field) {
            Some(text) => self.lookup(table, field, text),
            None => Value::NotAvailable,
        }
    }

    fn lookup<E: Enumerated>(&mut self, table: &AliasTable<E>, field: Field, text: &str) -> Value<E> {
        match table.lookup(text, self.registry.mode()) {
            Some(value) => *value,
            None => {
                self.log.unmatched(field, text, &self.raw.lineage);
                Value::NotAvailable
            }
        }
    }

    /// Geo fields resolved through the registry's canonicalizer.
    fn canonical(&mut self, field: Field) -> Value<String> {
        let Some(text) = self.raw.text(field) else {
            return Value::NotAvailable;
        };
        let canonical = self.registry.canonicalize(field, text);
        if !canonical.matched {
            self.log.unmatched(field, text, &self.raw.lineage);
        }
        canonical.value
    }

    fn parsed<T>(&mut self, field: Field, parse: impl Fn(&str) -> Option<T>) -> Value<T> {
        let Some(text) = self.raw.text(field) else {
            return Value::NotAvailable;
        };
        match parse(text) {
            Some(value) => Value::Known(value),
            None => {
                self.log.unparseable(field, text, &self.raw.lineage);
                Value::NotAvailable
            }
        }
    }

    fn coordinate(&mut self, field: Field, limit: f64) -> Value<Coordinate> {
        self.parsed(field, |text| {
            parse_f64(text)
                .filter(|degrees| degrees.abs() <= limit)
                .and_then(Coordinate::new)
        })
    }

    /// Years as a number, an `N years` phrase, or an experience code.
    fn experience(&mut self) -> Value<f64> {
        let Some(text) = self.raw.text(Field::RequiredExpYears) else {
            return Value::NotAvailable;
        };
        if let Some(years) = parse_f64(text).or_else(|| experience_years(text)) {
            return Value::Known(years);
        }
        match self.registry.experience_codes.lookup(text, self.registry.mode()) {
            Some(years) => *years,
            None => {
                self.log.unmatched(Field::RequiredExpYears, text, &self.raw.lineage);
                Value::NotAvailable
            }
        }
    }
}
