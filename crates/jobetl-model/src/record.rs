//! Records as they travel through the per-record stages.
//!
//! A [`RawRecord`] is what the schema mapper produces: source text keyed by
//! canonical field. Signal extraction fills its sentinel cells. The
//! normalizer turns it into a typed [`CanonicalRecord`], which enrichment and
//! validation refine in place. Neither has a primary key; identity is the
//! [`SourceRef`] lineage until the combiner assigns surrogate ids.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::enums::{
    CompanySize, EducationLevel, EmploymentType, Industry, JobLevel, RemoteOption, RoleName,
    SkillCategory, SkillLevel,
};
use crate::field::Field;
use crate::ids::{Coordinate, CurrencyCode, RecordId};
use crate::value::Value;

/// Where a record came from.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct SourceRef {
    /// Source dataset identifier (file stem).
    pub source: String,
    /// Zero-based data row within the source.
    pub row: usize,
    /// Source-side identifier, when the source supplied one.
    pub source_id: Option<String>,
}

impl SourceRef {
    pub fn new(source: impl Into<String>, row: usize) -> Self {
        Self {
            source: source.into(),
            row,
            source_id: None,
        }
    }
}

/// Reason a record is excluded from the fact table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DropReason {
    /// A NOT NULL field is still the sentinel after every fill stage.
    MissingRequired { field: Field },
    /// The posted date was present but could not be parsed.
    UnparseableDate { raw: String },
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::MissingRequired { field } => write!(f, "missing required {field}"),
            DropReason::UnparseableDate { raw } => write!(f, "unparseable posted_date '{raw}'"),
        }
    }
}

/// Per-row side channel recording what the stages did to a record.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct RecordFlags {
    /// Fields filled from the description text.
    pub extracted: BTreeSet<Field>,
    /// Fields filled by cross-field enrichment.
    pub enriched: BTreeSet<Field>,
    /// Fields reset by a soft validation check.
    pub soft_flagged: BTreeSet<Field>,
    /// Required-field failures; any entry excludes the record.
    pub invalid: Vec<DropReason>,
}

impl RecordFlags {
    pub fn is_invalid(&self) -> bool {
        !self.invalid.is_empty()
    }

    pub fn mark_invalid(&mut self, reason: DropReason) {
        if !self.invalid.contains(&reason) {
            self.invalid.push(reason);
        }
    }
}

/// A source row aligned to canonical field names, values still raw text.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub lineage: SourceRef,
    pub id: RecordId,
    cells: BTreeMap<Field, Value<String>>,
    pub flags: RecordFlags,
}

static NOT_AVAILABLE_CELL: Value<String> = Value::NotAvailable;

impl RawRecord {
    pub fn new(lineage: SourceRef, id: RecordId) -> Self {
        Self {
            lineage,
            id,
            cells: BTreeMap::new(),
            flags: RecordFlags::default(),
        }
    }

    pub fn get(&self, field: Field) -> &Value<String> {
        self.cells.get(&field).unwrap_or(&NOT_AVAILABLE_CELL)
    }

    pub fn text(&self, field: Field) -> Option<&str> {
        self.get(field).known().map(String::as_str)
    }

    pub fn set(&mut self, field: Field, value: Value<String>) {
        self.cells.insert(field, value);
    }

    /// Fill a sentinel cell from description text; present values are kept.
    pub fn fill_extracted(&mut self, field: Field, value: impl Into<String>) -> bool {
        let slot = self.cells.entry(field).or_default();
        if slot.fill(Value::Known(value.into())) {
            self.flags.extracted.insert(field);
            true
        } else {
            false
        }
    }
}

/// A skill attached to one posting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkillEntry {
    pub category: Value<SkillCategory>,
    pub level: Value<SkillLevel>,
}

/// A fully typed record: every enumerated field is a closed-enum member or
/// the sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRecord {
    pub lineage: SourceRef,
    pub id: RecordId,

    pub company_name: Value<String>,
    pub company_size: Value<CompanySize>,
    pub industry: Value<Industry>,

    pub city: Value<String>,
    pub country: Value<String>,
    pub country_iso: Value<String>,
    pub latitude: Value<Coordinate>,
    pub longitude: Value<Coordinate>,
    pub population: Value<u64>,

    pub posted_date: Value<NaiveDate>,
    pub min_salary: Value<f64>,
    pub max_salary: Value<f64>,
    pub currency: Value<CurrencyCode>,
    pub required_exp_years: Value<f64>,
    pub education_level: Value<EducationLevel>,
    pub employment_type: Value<EmploymentType>,
    pub remote_option: Value<RemoteOption>,
    pub job_description: Value<String>,

    /// Original role title; standardized into `roles` by enrichment.
    pub role_title: Value<String>,
    pub roles: BTreeSet<RoleName>,
    pub levels: BTreeSet<JobLevel>,
    /// Canonical skill name to posting-specific attributes.
    pub skills: BTreeMap<String, SkillEntry>,

    pub flags: RecordFlags,
}

impl CanonicalRecord {
    pub fn new(lineage: SourceRef, id: RecordId) -> Self {
        Self {
            lineage,
            id,
            company_name: Value::NotAvailable,
            company_size: Value::NotAvailable,
            industry: Value::NotAvailable,
            city: Value::NotAvailable,
            country: Value::NotAvailable,
            country_iso: Value::NotAvailable,
            latitude: Value::NotAvailable,
            longitude: Value::NotAvailable,
            population: Value::NotAvailable,
            posted_date: Value::NotAvailable,
            min_salary: Value::NotAvailable,
            max_salary: Value::NotAvailable,
            currency: Value::NotAvailable,
            required_exp_years: Value::NotAvailable,
            education_level: Value::NotAvailable,
            employment_type: Value::NotAvailable,
            remote_option: Value::NotAvailable,
            job_description: Value::NotAvailable,
            role_title: Value::NotAvailable,
            roles: BTreeSet::new(),
            levels: BTreeSet::new(),
            skills: BTreeMap::new(),
            flags: RecordFlags::default(),
        }
    }

    /// Whether a single-valued field currently holds the sentinel.
    ///
    /// Set-valued fields report absence when empty.
    pub fn is_na(&self, field: Field) -> bool {
        match field {
            Field::SourceId => self.lineage.source_id.is_none(),
            Field::SkillName => self.skills.is_empty(),
            Field::SkillCategory => self.skills.values().all(|entry| entry.category.is_na()),
            Field::SkillLevelRequired => self.skills.values().all(|entry| entry.level.is_na()),
            Field::CompanyName => self.company_name.is_na(),
            Field::CompanySize => self.company_size.is_na(),
            Field::Industry => self.industry.is_na(),
            Field::City => self.city.is_na(),
            Field::Country => self.country.is_na(),
            Field::CountryIso => self.country_iso.is_na(),
            Field::Latitude => self.latitude.is_na(),
            Field::Longitude => self.longitude.is_na(),
            Field::Population => self.population.is_na(),
            Field::RoleName => self.roles.is_empty(),
            Field::JobLevel => self.levels.is_empty(),
            Field::EmploymentType => self.employment_type.is_na(),
            Field::PostedDate => self.posted_date.is_na(),
            Field::MinSalary => self.min_salary.is_na(),
            Field::MaxSalary => self.max_salary.is_na(),
            Field::Currency => self.currency.is_na(),
            Field::RequiredExpYears => self.required_exp_years.is_na(),
            Field::EducationLevel => self.education_level.is_na(),
            Field::JobDescription => self.job_description.is_na(),
            Field::RemoteOption => self.remote_option.is_na(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lineage() -> SourceRef {
        SourceRef::new("linkedin", 0)
    }

    #[test]
    fn fill_extracted_respects_present_values() {
        let mut record = RawRecord::new(lineage(), RecordId::from_first_16_bytes_of_sha256([0; 32]));
        record.set(Field::City, Value::Known("Hamburg".to_string()));
        assert!(!record.fill_extracted(Field::City, "Berlin"));
        assert!(record.fill_extracted(Field::Country, "Germany"));
        assert_eq!(record.text(Field::City), Some("Hamburg"));
        assert_eq!(record.text(Field::Country), Some("Germany"));
        assert!(record.flags.extracted.contains(&Field::Country));
        assert!(!record.flags.extracted.contains(&Field::City));
    }

    #[test]
    fn mark_invalid_deduplicates_reasons() {
        let mut flags = RecordFlags::default();
        let reason = DropReason::MissingRequired {
            field: Field::PostedDate,
        };
        flags.mark_invalid(reason.clone());
        flags.mark_invalid(reason);
        assert_eq!(flags.invalid.len(), 1);
        assert!(flags.is_invalid());
    }
}
