//! Combiner / splitter: validated records to relational tables.
//!
//! Dimension rows are deduplicated by value equality of their defining
//! attributes over the whole merged set, then numbered in sorted key order.
//! The same input therefore yields the same dimension content whatever
//! order records arrive in. Job ids follow the merged record order.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use jobetl_model::{
    CanonicalRecord, CompanyRow, CompanySize, Coordinate, DecomposedTables, Industry,
    JobLevelRow, JobPostingRow, JobRoleRow, JobSkillRow, LocationRow, RoleRow,
    SkillCategory, SkillRow, SurrogateId, Value,
};
use tracing::{info, info_span, warn};

type CompanyKey = (Value<String>, Value<CompanySize>, Value<Industry>);
type LocationKey = (
    Value<String>,
    Value<String>,
    Value<String>,
    Value<Coordinate>,
    Value<Coordinate>,
);

fn company_key(record: &CanonicalRecord) -> CompanyKey {
    (
        record.company_name.clone(),
        record.company_size,
        record.industry,
    )
}

fn location_key(record: &CanonicalRecord) -> LocationKey {
    (
        record.city.clone(),
        record.country.clone(),
        record.country_iso.clone(),
        record.latitude,
        record.longitude,
    )
}

/// Keep the larger known value.
fn max_known<T: Ord + Copy>(current: Value<T>, candidate: Value<T>) -> Value<T> {
    match (current, candidate) {
        (Value::Known(a), Value::Known(b)) => Value::Known(a.max(b)),
        (Value::NotAvailable, other) | (other, Value::NotAvailable) => other,
    }
}

/// Keep the smaller known value.
fn min_known<T: Ord + Copy>(current: Value<T>, candidate: Value<T>) -> Value<T> {
    match (current, candidate) {
        (Value::Known(a), Value::Known(b)) => Value::Known(a.min(b)),
        (Value::NotAvailable, other) | (other, Value::NotAvailable) => other,
    }
}

fn assign_ids<K: Ord + Clone>(keys: impl IntoIterator<Item = K>) -> BTreeMap<K, SurrogateId> {
    keys.into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .zip(1..)
        .collect()
}

/// Decompose validated records into dimension, fact and bridge tables.
///
/// Records still marked invalid are skipped; callers normally filter them
/// out before this point.
pub fn combine(records: &[CanonicalRecord]) -> DecomposedTables {
    let span = info_span!("combine", records = records.len());
    let _guard = span.enter();
    let start = Instant::now();

    let valid: Vec<&CanonicalRecord> = records
        .iter()
        .filter(|record| !record.flags.is_invalid())
        .collect();
    if valid.len() != records.len() {
        warn!(
            skipped = records.len() - valid.len(),
            "invalid records passed to combiner were skipped"
        );
    }

    let company_ids = assign_ids(valid.iter().map(|record| company_key(record)));
    let location_ids = assign_ids(valid.iter().map(|record| location_key(record)));
    let role_ids = assign_ids(valid.iter().flat_map(|record| record.roles.iter().copied()));

    let mut populations: BTreeMap<LocationKey, Value<u64>> = BTreeMap::new();
    let mut skill_categories: BTreeMap<&str, Value<SkillCategory>> = BTreeMap::new();
    for record in &valid {
        let population = populations
            .entry(location_key(record))
            .or_insert(Value::NotAvailable);
        *population = max_known(*population, record.population);
        for (name, entry) in &record.skills {
            let category = skill_categories
                .entry(name.as_str())
                .or_insert(Value::NotAvailable);
            *category = min_known(*category, entry.category);
        }
    }
    let skill_ids: BTreeMap<&str, SurrogateId> = skill_categories.keys().copied().zip(1..).collect();

    let mut tables = DecomposedTables {
        companies: company_ids
            .iter()
            .map(|((name, size, industry), &company_id)| CompanyRow {
                company_id,
                company_name: name.clone(),
                size: *size,
                industry: *industry,
            })
            .collect(),
        locations: location_ids
            .iter()
            .map(|(key, &location_id)| {
                let (city, country, country_iso, latitude, longitude) = key.clone();
                LocationRow {
                    location_id,
                    city,
                    country,
                    country_iso,
                    latitude,
                    longitude,
                    population: populations.get(key).copied().unwrap_or_default(),
                }
            })
            .collect(),
        skills: skill_categories
            .iter()
            .zip(1..)
            .map(|((name, category), skill_id)| SkillRow {
                skill_id,
                skill_name: (*name).to_string(),
                skill_category: *category,
            })
            .collect(),
        roles: role_ids
            .iter()
            .map(|(&role_name, &role_id)| RoleRow { role_id, role_name })
            .collect(),
        ..DecomposedTables::default()
    };

    for (record, job_id) in valid.iter().zip(1..) {
        let (Some(&company_id), Some(&location_id)) = (
            company_ids.get(&company_key(record)),
            location_ids.get(&location_key(record)),
        ) else {
            continue;
        };
        let Value::Known(posted_date) = record.posted_date else {
            continue;
        };

        tables.job_postings.push(JobPostingRow {
            job_id,
            company_id,
            location_id,
            posted_date,
            min_salary: record.min_salary,
            max_salary: record.max_salary,
            currency: record.currency.clone(),
            required_exp_years: record.required_exp_years,
            education_level: record.education_level,
            employment_type: record.employment_type,
            remote_option: record.remote_option,
            job_description: record.job_description.clone(),
        });
        tables.lineage.push(record.lineage.clone());

        // Bridge rows come out in canonical-value order.
        for (name, entry) in &record.skills {
            if let Some(&skill_id) = skill_ids.get(name.as_str()) {
                tables.job_skills.push(JobSkillRow {
                    job_id,
                    skill_id,
                    skill_level_required: entry.level,
                });
            }
        }
        for role in &record.roles {
            if let Some(&role_id) = role_ids.get(role) {
                tables.job_roles.push(JobRoleRow { job_id, role_id });
            }
        }
        for &level in &record.levels {
            tables.job_levels.push(JobLevelRow { job_id, level });
        }
    }

    info!(
        jobs = tables.job_postings.len(),
        companies = tables.companies.len(),
        locations = tables.locations.len(),
        skills = tables.skills.len(),
        roles = tables.roles.len(),
        duration_ms = start.elapsed().as_millis(),
        "combine complete"
    );
    tables
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values_win_over_sentinel() {
        assert_eq!(max_known(Value::NotAvailable, Value::Known(3)), Value::Known(3));
        assert_eq!(max_known(Value::Known(5), Value::Known(3)), Value::Known(5));
        assert_eq!(min_known(Value::Known(5), Value::Known(3)), Value::Known(3));
        assert_eq!(min_known(Value::<u8>::NotAvailable, Value::NotAvailable), Value::NotAvailable);
    }

    #[test]
    fn ids_follow_sorted_key_order() {
        let ids = assign_ids(["b", "a", "b", "c"]);
        assert_eq!(ids.get("a"), Some(&1));
        assert_eq!(ids.get("b"), Some(&2));
        assert_eq!(ids.get("c"), Some(&3));
    }
}
