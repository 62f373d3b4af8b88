//! Decomposed relational entities.
//!
//! Rows are created once by the combiner and never mutated afterwards.
//! Column names match the target schema.

use chrono::NaiveDate;

use crate::enums::{
    CompanySize, EducationLevel, EmploymentType, Industry, JobLevel, RemoteOption, RoleName,
    SkillCategory, SkillLevel,
};
use crate::ids::{Coordinate, CurrencyCode};
use crate::record::SourceRef;
use crate::value::Value;

pub type SurrogateId = u64;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CompanyRow {
    pub company_id: SurrogateId,
    pub company_name: Value<String>,
    pub size: Value<CompanySize>,
    pub industry: Value<Industry>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct LocationRow {
    pub location_id: SurrogateId,
    pub city: Value<String>,
    pub country: Value<String>,
    pub country_iso: Value<String>,
    pub latitude: Value<Coordinate>,
    pub longitude: Value<Coordinate>,
    pub population: Value<u64>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SkillRow {
    pub skill_id: SurrogateId,
    pub skill_name: String,
    pub skill_category: Value<SkillCategory>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RoleRow {
    pub role_id: SurrogateId,
    pub role_name: RoleName,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct JobPostingRow {
    pub job_id: SurrogateId,
    pub company_id: SurrogateId,
    pub location_id: SurrogateId,
    pub posted_date: NaiveDate,
    pub min_salary: Value<f64>,
    pub max_salary: Value<f64>,
    pub currency: Value<CurrencyCode>,
    pub required_exp_years: Value<f64>,
    pub education_level: Value<EducationLevel>,
    pub employment_type: Value<EmploymentType>,
    pub remote_option: Value<RemoteOption>,
    pub job_description: Value<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct JobSkillRow {
    pub job_id: SurrogateId,
    pub skill_id: SurrogateId,
    pub skill_level_required: Value<SkillLevel>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct JobRoleRow {
    pub job_id: SurrogateId,
    pub role_id: SurrogateId,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct JobLevelRow {
    pub job_id: SurrogateId,
    pub level: JobLevel,
}

/// All output tables of one run, each in its emission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecomposedTables {
    pub companies: Vec<CompanyRow>,
    pub locations: Vec<LocationRow>,
    pub skills: Vec<SkillRow>,
    pub roles: Vec<RoleRow>,
    pub job_postings: Vec<JobPostingRow>,
    pub job_skills: Vec<JobSkillRow>,
    pub job_roles: Vec<JobRoleRow>,
    pub job_levels: Vec<JobLevelRow>,
    /// Lineage of each fact row, indexed like `job_postings`.
    pub lineage: Vec<SourceRef>,
}

impl DecomposedTables {
    pub fn company(&self, company_id: SurrogateId) -> Option<&CompanyRow> {
        self.companies.iter().find(|row| row.company_id == company_id)
    }

    pub fn location(&self, location_id: SurrogateId) -> Option<&LocationRow> {
        self.locations.iter().find(|row| row.location_id == location_id)
    }

    pub fn skill_name(&self, skill_id: SurrogateId) -> Option<&str> {
        self.skills
            .iter()
            .find(|row| row.skill_id == skill_id)
            .map(|row| row.skill_name.as_str())
    }

    pub fn role_name(&self, role_id: SurrogateId) -> Option<RoleName> {
        self.roles
            .iter()
            .find(|row| row.role_id == role_id)
            .map(|row| row.role_name)
    }

    /// Skill names of a job joined the way downstream aggregation renders
    /// them (`STRING_AGG(skill_name, '; ' ORDER BY skill_name)`).
    pub fn skill_list(&self, job_id: SurrogateId) -> String {
        self.job_skills
            .iter()
            .filter(|row| row.job_id == job_id)
            .filter_map(|row| self.skill_name(row.skill_id))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
