//! Entity rows as polars frames.
//!
//! Enumerated and text columns carry the `__NA__` marker for the sentinel so
//! the store sees a legal enumeration member. Numeric columns carry a null,
//! which the CSV writer renders as an empty cell.

use polars::prelude::*;

use jobetl_model::{Coordinate, DecomposedTables, SurrogateId, Value};

/// Output tables in bulk-load dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputTable {
    Companies,
    Locations,
    Skills,
    RoleNames,
    JobPostings,
    JobSkills,
    JobRoles,
    JobLevels,
}

impl OutputTable {
    /// Dimensions first, then the fact table, then bridges.
    pub const LOAD_ORDER: [OutputTable; 8] = [
        OutputTable::Companies,
        OutputTable::Locations,
        OutputTable::Skills,
        OutputTable::RoleNames,
        OutputTable::JobPostings,
        OutputTable::JobSkills,
        OutputTable::JobRoles,
        OutputTable::JobLevels,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OutputTable::Companies => "companies",
            OutputTable::Locations => "locations",
            OutputTable::Skills => "skills",
            OutputTable::RoleNames => "role_names",
            OutputTable::JobPostings => "job_postings",
            OutputTable::JobSkills => "job_skills",
            OutputTable::JobRoles => "job_roles",
            OutputTable::JobLevels => "job_levels",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.csv", self.name())
    }

    pub fn frame(self, tables: &DecomposedTables) -> PolarsResult<DataFrame> {
        match self {
            OutputTable::Companies => companies_frame(tables),
            OutputTable::Locations => locations_frame(tables),
            OutputTable::Skills => skills_frame(tables),
            OutputTable::RoleNames => roles_frame(tables),
            OutputTable::JobPostings => job_postings_frame(tables),
            OutputTable::JobSkills => job_skills_frame(tables),
            OutputTable::JobRoles => job_roles_frame(tables),
            OutputTable::JobLevels => job_levels_frame(tables),
        }
    }
}

fn ids<T>(rows: &[T], id: impl Fn(&T) -> SurrogateId) -> Vec<u64> {
    rows.iter().map(id).collect()
}

fn labels<T>(rows: &[T], value: impl Fn(&T) -> String) -> Vec<String> {
    rows.iter().map(value).collect()
}

fn numbers<T>(rows: &[T], value: impl Fn(&T) -> Value<f64>) -> Vec<Option<f64>> {
    rows.iter().map(|row| value(row).into_option()).collect()
}

fn degrees(value: Value<Coordinate>) -> Value<f64> {
    value.map(Coordinate::degrees)
}

pub fn companies_frame(tables: &DecomposedTables) -> PolarsResult<DataFrame> {
    let rows = &tables.companies;
    DataFrame::new(vec![
        Column::new("company_id".into(), ids(rows, |row| row.company_id)),
        Column::new("company_name".into(), labels(rows, |row| row.company_name.to_string())),
        Column::new("size".into(), labels(rows, |row| row.size.to_string())),
        Column::new("industry".into(), labels(rows, |row| row.industry.to_string())),
    ])
}

pub fn locations_frame(tables: &DecomposedTables) -> PolarsResult<DataFrame> {
    let rows = &tables.locations;
    let population: Vec<Option<u64>> = rows.iter().map(|row| row.population.into_option()).collect();
    DataFrame::new(vec![
        Column::new("location_id".into(), ids(rows, |row| row.location_id)),
        Column::new("city".into(), labels(rows, |row| row.city.to_string())),
        Column::new("country".into(), labels(rows, |row| row.country.to_string())),
        Column::new("country_iso".into(), labels(rows, |row| row.country_iso.to_string())),
        Column::new("latitude".into(), numbers(rows, |row| degrees(row.latitude))),
        Column::new("longitude".into(), numbers(rows, |row| degrees(row.longitude))),
        Column::new("population".into(), population),
    ])
}

pub fn skills_frame(tables: &DecomposedTables) -> PolarsResult<DataFrame> {
    let rows = &tables.skills;
    DataFrame::new(vec![
        Column::new("skill_id".into(), ids(rows, |row| row.skill_id)),
        Column::new("skill_name".into(), labels(rows, |row| row.skill_name.clone())),
        Column::new("skill_category".into(), labels(rows, |row| row.skill_category.to_string())),
    ])
}

pub fn roles_frame(tables: &DecomposedTables) -> PolarsResult<DataFrame> {
    let rows = &tables.roles;
    DataFrame::new(vec![
        Column::new("role_id".into(), ids(rows, |row| row.role_id)),
        Column::new("role_name".into(), labels(rows, |row| row.role_name.to_string())),
    ])
}

pub fn job_postings_frame(tables: &DecomposedTables) -> PolarsResult<DataFrame> {
    let rows = &tables.job_postings;
    DataFrame::new(vec![
        Column::new("job_id".into(), ids(rows, |row| row.job_id)),
        Column::new("company_id".into(), ids(rows, |row| row.company_id)),
        Column::new("location_id".into(), ids(rows, |row| row.location_id)),
        Column::new("posted_date".into(), labels(rows, |row| row.posted_date.to_string())),
        Column::new("min_salary".into(), numbers(rows, |row| row.min_salary)),
        Column::new("max_salary".into(), numbers(rows, |row| row.max_salary)),
        Column::new("currency".into(), labels(rows, |row| row.currency.to_string())),
        Column::new(
            "required_exp_years".into(),
            numbers(rows, |row| row.required_exp_years),
        ),
        Column::new("education_level".into(), labels(rows, |row| row.education_level.to_string())),
        Column::new("employment_type".into(), labels(rows, |row| row.employment_type.to_string())),
        Column::new("remote_option".into(), labels(rows, |row| row.remote_option.to_string())),
        Column::new("job_description".into(), labels(rows, |row| row.job_description.to_string())),
    ])
}

pub fn job_skills_frame(tables: &DecomposedTables) -> PolarsResult<DataFrame> {
    let rows = &tables.job_skills;
    DataFrame::new(vec![
        Column::new("job_id".into(), ids(rows, |row| row.job_id)),
        Column::new("skill_id".into(), ids(rows, |row| row.skill_id)),
        Column::new(
            "skill_level_required".into(),
            labels(rows, |row| row.skill_level_required.to_string()),
        ),
    ])
}

pub fn job_roles_frame(tables: &DecomposedTables) -> PolarsResult<DataFrame> {
    let rows = &tables.job_roles;
    DataFrame::new(vec![
        Column::new("job_id".into(), ids(rows, |row| row.job_id)),
        Column::new("role_id".into(), ids(rows, |row| row.role_id)),
    ])
}

pub fn job_levels_frame(tables: &DecomposedTables) -> PolarsResult<DataFrame> {
    let rows = &tables.job_levels;
    DataFrame::new(vec![
        Column::new("job_id".into(), ids(rows, |row| row.job_id)),
        Column::new("level".into(), labels(rows, |row| row.level.to_string())),
    ])
}
