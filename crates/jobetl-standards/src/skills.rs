//! Skill reference: spellings, category and default required level.

use std::collections::BTreeMap;
use std::path::Path;

use jobetl_model::{Enumerated, MatchingMode, SkillCategory, SkillLevel, Value};

use crate::csv_utils::{get_field, get_optional, read_csv_rows};
use crate::error::ReferenceError;
use crate::table::{AliasTable, parse_canonical};

#[derive(Debug, Clone, PartialEq)]
pub struct SkillRef {
    pub name: String,
    pub category: Value<SkillCategory>,
    pub level: Value<SkillLevel>,
}

#[derive(Debug, Clone, Default)]
pub struct SkillReference {
    spellings: AliasTable<String>,
    skills: BTreeMap<String, SkillRef>,
}

impl SkillReference {
    pub fn load(path: &Path) -> Result<Self, ReferenceError> {
        let mut reference = Self::default();
        for row in read_csv_rows(path, &["alias", "skill_name", "skill_category", "skill_level"])? {
            let name = get_field(&row, "skill_name");
            if name.is_empty() {
                continue;
            }
            let category = match get_optional(&row, "skill_category") {
                None => Value::NotAvailable,
                Some(cell) => parse_canonical(
                    path,
                    SkillCategory::FIELD.name(),
                    cell,
                    SkillCategory::from_canonical,
                )?,
            };
            let level = match get_optional(&row, "skill_level") {
                None => Value::NotAvailable,
                Some(cell) => {
                    parse_canonical(path, SkillLevel::FIELD.name(), cell, SkillLevel::from_canonical)?
                }
            };
            let skill = SkillRef {
                name: name.to_string(),
                category,
                level,
            };
            if let Some(existing) = reference.skills.get(name) {
                if existing != &skill {
                    return Err(ReferenceError::ConflictingAlias {
                        path: path.to_path_buf(),
                        alias: name.to_string(),
                        first: format!("{}/{}", existing.category, existing.level),
                        second: format!("{}/{}", skill.category, skill.level),
                    });
                }
            }
            reference.skills.insert(name.to_string(), skill);

            let canonical = Value::Known(name.to_string());
            reference.spellings.insert(path, name, canonical.clone())?;
            reference
                .spellings
                .insert(path, get_field(&row, "alias"), canonical)?;
        }
        Ok(reference)
    }

    pub fn resolve(&self, raw: &str, mode: MatchingMode) -> Option<&SkillRef> {
        self.spellings
            .lookup(raw, mode)
            .and_then(Value::known)
            .and_then(|name| self.skills.get(name))
    }

    pub fn get(&self, name: &str) -> Option<&SkillRef> {
        self.skills.get(name)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}
