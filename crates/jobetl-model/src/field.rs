//! Canonical field catalogue.
//!
//! Every column a source is mapped onto has exactly one canonical name, one
//! value kind and a declared fill policy.

use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Marker in a mapping configuration for a column that is dropped on purpose.
pub const UNUSED_MARKER: &str = "unused";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    SourceId,
    SkillName,
    SkillCategory,
    CompanyName,
    CompanySize,
    Industry,
    City,
    Country,
    CountryIso,
    Latitude,
    Longitude,
    Population,
    RoleName,
    JobLevel,
    EmploymentType,
    SkillLevelRequired,
    PostedDate,
    MinSalary,
    MaxSalary,
    Currency,
    RequiredExpYears,
    EducationLevel,
    JobDescription,
    RemoteOption,
}

/// Value kind carried by a canonical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Date,
    /// Member of a closed enumeration or reference-backed value set.
    Enumerated,
    /// Set-valued; serialized as delimited text only at the boundary.
    MultiValued,
}

impl Field {
    pub const ALL: &'static [Field] = &[
        Field::SourceId,
        Field::SkillName,
        Field::SkillCategory,
        Field::CompanyName,
        Field::CompanySize,
        Field::Industry,
        Field::City,
        Field::Country,
        Field::CountryIso,
        Field::Latitude,
        Field::Longitude,
        Field::Population,
        Field::RoleName,
        Field::JobLevel,
        Field::EmploymentType,
        Field::SkillLevelRequired,
        Field::PostedDate,
        Field::MinSalary,
        Field::MaxSalary,
        Field::Currency,
        Field::RequiredExpYears,
        Field::EducationLevel,
        Field::JobDescription,
        Field::RemoteOption,
    ];

    /// Fields that must be mapped for a source to be processed at all.
    ///
    /// These are NOT NULL in the fact table, but apart from the posted date
    /// their enumerations admit the sentinel, so a record holding `__NA__`
    /// in them is still kept.
    pub const REQUIRED: &'static [Field] = &[
        Field::PostedDate,
        Field::EmploymentType,
        Field::RemoteOption,
        Field::EducationLevel,
        Field::Currency,
    ];

    /// Required fields with no sentinel member: a record missing one is dropped.
    pub const DROP_IF_MISSING: &'static [Field] = &[Field::PostedDate];

    pub fn name(&self) -> &'static str {
        match self {
            Field::SourceId => "__source_id",
            Field::SkillName => "skill_name",
            Field::SkillCategory => "skill_category",
            Field::CompanyName => "company_name",
            Field::CompanySize => "company_size",
            Field::Industry => "industry",
            Field::City => "city",
            Field::Country => "country",
            Field::CountryIso => "country_iso",
            Field::Latitude => "latitude",
            Field::Longitude => "longitude",
            Field::Population => "population",
            Field::RoleName => "role_name",
            Field::JobLevel => "job_level",
            Field::EmploymentType => "employment_type",
            Field::SkillLevelRequired => "skill_level_required",
            Field::PostedDate => "posted_date",
            Field::MinSalary => "min_salary",
            Field::MaxSalary => "max_salary",
            Field::Currency => "currency",
            Field::RequiredExpYears => "required_exp_years",
            Field::EducationLevel => "education_level",
            Field::JobDescription => "job_description",
            Field::RemoteOption => "remote_option",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Field::SourceId | Field::CompanyName | Field::JobDescription => FieldKind::Text,
            Field::Latitude
            | Field::Longitude
            | Field::Population
            | Field::MinSalary
            | Field::MaxSalary
            | Field::RequiredExpYears => FieldKind::Number,
            Field::PostedDate => FieldKind::Date,
            Field::SkillName | Field::RoleName | Field::JobLevel => FieldKind::MultiValued,
            Field::SkillCategory
            | Field::CompanySize
            | Field::Industry
            | Field::City
            | Field::Country
            | Field::CountryIso
            | Field::EmploymentType
            | Field::SkillLevelRequired
            | Field::Currency
            | Field::EducationLevel
            | Field::RemoteOption => FieldKind::Enumerated,
        }
    }

    /// Whether signal extraction or enrichment may populate the field when
    /// the source left it absent.
    pub fn is_fillable(&self) -> bool {
        matches!(
            self,
            Field::City
                | Field::Country
                | Field::CountryIso
                | Field::Latitude
                | Field::Longitude
                | Field::Population
                | Field::RemoteOption
                | Field::MinSalary
                | Field::MaxSalary
                | Field::Currency
                | Field::RequiredExpYears
                | Field::SkillCategory
                | Field::SkillLevelRequired
                | Field::JobLevel
        )
    }

    pub fn is_required(&self) -> bool {
        Self::REQUIRED.contains(self)
    }

    pub fn drops_record_when_missing(&self) -> bool {
        Self::DROP_IF_MISSING.contains(self)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        // the mapping tool historically emitted "level" for job_level
        let key = if key == "level" { "job_level".to_string() } else { key };
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.name() == key)
            .ok_or_else(|| ModelError::UnknownField(s.to_string()))
    }
}

impl serde::Serialize for Field {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for field in Field::ALL {
            assert_eq!(field.name().parse::<Field>(), Ok(*field));
        }
        assert_eq!(" Posted_Date ".parse::<Field>(), Ok(Field::PostedDate));
        assert_eq!("level".parse::<Field>(), Ok(Field::JobLevel));
        assert!("salary".parse::<Field>().is_err());
    }

    #[test]
    fn posted_date_is_required_and_not_fillable() {
        assert!(Field::PostedDate.is_required());
        assert!(Field::PostedDate.drops_record_when_missing());
        assert!(Field::EducationLevel.is_required());
        assert!(!Field::EducationLevel.drops_record_when_missing());
        assert!(!Field::PostedDate.is_fillable());
        assert!(Field::City.is_fillable());
        assert!(!Field::Industry.is_fillable());
    }
}
