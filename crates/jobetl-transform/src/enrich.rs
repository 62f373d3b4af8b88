//! Cross-field enrichment of a normalized record.
//!
//! Values are derived from other fields of the same record plus the static
//! reference tables. Every fill goes through [`Value::fill`], so a concrete
//! value is never replaced.

use std::collections::BTreeSet;

use jobetl_model::{CanonicalRecord, DiagnosticLog, Field, MatchingMode, Value};
use jobetl_standards::{ReferenceRegistry, tokenize};

use crate::roles::{match_roles, ngrams};

/// Level words span at most two tokens ("entry level", "mid level").
const LEVEL_NGRAM: usize = 2;

/// Fill derivable fields of `record` in place.
///
/// Returns the fields that changed from the sentinel to a value.
pub fn enrich_record(
    record: &mut CanonicalRecord,
    registry: &ReferenceRegistry,
    log: &mut DiagnosticLog,
) -> BTreeSet<Field> {
    let before = record.flags.enriched.clone();
    enrich_geo(record, registry, log);
    enrich_skills(record, registry);
    enrich_roles(record, registry, log);
    enrich_levels(record, registry);
    record.flags.enriched.difference(&before).copied().collect()
}

fn fill<T>(enriched: &mut BTreeSet<Field>, field: Field, slot: &mut Value<T>, candidate: Value<T>) {
    if slot.fill(candidate) {
        enriched.insert(field);
    }
}

fn enrich_geo(record: &mut CanonicalRecord, registry: &ReferenceRegistry, log: &mut DiagnosticLog) {
    let geo = &registry.geo;
    let enriched = &mut record.flags.enriched;

    if record.country.is_na()
        && let Some(iso) = record.country_iso.known()
        && let Some(country) = geo.country_by_iso(iso)
    {
        fill(
            enriched,
            Field::Country,
            &mut record.country,
            Value::Known(country.name.clone()),
        );
    }

    if record.country.is_na()
        && let Some(city) = record.city.known()
    {
        match geo.country_of_city(city) {
            Some(country) => fill(
                enriched,
                Field::Country,
                &mut record.country,
                Value::Known(country.name.clone()),
            ),
            // ambiguous or unlisted city; country stays unknown
            None => log.unmatched(Field::Country, city, &record.lineage),
        }
    }

    let Some(country) = record
        .country
        .known()
        .and_then(|name| geo.resolve_country(name, MatchingMode::Strict))
    else {
        return;
    };
    fill(
        enriched,
        Field::CountryIso,
        &mut record.country_iso,
        Value::Known(country.iso_code.clone()),
    );
    fill(enriched, Field::Latitude, &mut record.latitude, country.latitude);
    fill(enriched, Field::Longitude, &mut record.longitude, country.longitude);
    fill(enriched, Field::Population, &mut record.population, country.population);
}

fn enrich_skills(record: &mut CanonicalRecord, registry: &ReferenceRegistry) {
    let enriched = &mut record.flags.enriched;
    for (name, entry) in &mut record.skills {
        let Some(skill) = registry.skills.get(name) else {
            continue;
        };
        fill(enriched, Field::SkillCategory, &mut entry.category, skill.category);
        fill(enriched, Field::SkillLevelRequired, &mut entry.level, skill.level);
    }
}

fn enrich_roles(record: &mut CanonicalRecord, registry: &ReferenceRegistry, log: &mut DiagnosticLog) {
    if !record.roles.is_empty() {
        return;
    }
    let Some(title) = record.role_title.known() else {
        return;
    };
    let roles = match_roles(title, &registry.roles);
    if roles.is_empty() {
        log.unmatched(Field::RoleName, title, &record.lineage);
        return;
    }
    record.roles = roles;
    record.flags.enriched.insert(Field::RoleName);
}

/// Level words in the role title, resolved through the job-level table.
fn enrich_levels(record: &mut CanonicalRecord, registry: &ReferenceRegistry) {
    if !record.levels.is_empty() {
        return;
    }
    let Some(title) = record.role_title.known() else {
        return;
    };
    for gram in ngrams(&tokenize(title), LEVEL_NGRAM) {
        if let Some(Value::Known(level)) = registry.job_levels.lookup(&gram, MatchingMode::Strict) {
            record.levels.insert(*level);
        }
    }
    if !record.levels.is_empty() {
        record.flags.enriched.insert(Field::JobLevel);
    }
}
