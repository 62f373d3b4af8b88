//! Role taxonomy terms.
//!
//! Terms are stored as space-joined [`tokenize`] output so they compare
//! directly against tokenized titles.

use std::collections::BTreeSet;
use std::path::Path;

use jobetl_model::{Enumerated, RoleName};

use crate::csv_utils::{get_field, read_csv_rows, split_list};
use crate::error::ReferenceError;
use crate::keys::tokenize;

/// Phrase rule for one canonical role.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleRule {
    pub role: RoleName,
    /// Canonical spelling, aliases and strong terms.
    pub terms: Vec<String>,
    /// A title containing any of these tokens never maps to `role`.
    pub exclude: BTreeSet<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RoleTaxonomy {
    pub rules: Vec<RoleRule>,
    /// Core word to role, in precedence order.
    pub core: Vec<(String, RoleName)>,
    /// Tokens that make a core word count as a data role.
    pub context: BTreeSet<String>,
    pub leadership: Vec<(String, RoleName)>,
    pub leadership_anchor: BTreeSet<String>,
    pub leadership_exclude: BTreeSet<String>,
    /// Markers that turn a leadership title into their role.
    pub ai_markers: Vec<(String, RoleName)>,
}

fn normalized_term(raw: &str) -> String {
    tokenize(raw).join(" ")
}

fn parse_role(path: &Path, cell: &str) -> Result<RoleName, ReferenceError> {
    RoleName::from_canonical(cell)
        .ok_or_else(|| ReferenceError::illegal(path, RoleName::FIELD.name(), cell))
}

impl RoleTaxonomy {
    pub fn load(roles_path: &Path, rules_path: &Path) -> Result<Self, ReferenceError> {
        let mut taxonomy = Self::default();

        for row in read_csv_rows(
            roles_path,
            &["canonical_role", "aliases", "strong_terms", "exclude_terms"],
        )? {
            let cell = get_field(&row, "canonical_role");
            if cell.is_empty() {
                continue;
            }
            let role = parse_role(roles_path, cell)?;
            let mut terms = vec![normalized_term(role.as_str())];
            for term in split_list(get_field(&row, "aliases"))
                .chain(split_list(get_field(&row, "strong_terms")))
            {
                let term = normalized_term(term);
                if !term.is_empty() && !terms.contains(&term) {
                    terms.push(term);
                }
            }
            let exclude = split_list(get_field(&row, "exclude_terms"))
                .flat_map(tokenize)
                .collect();
            taxonomy.rules.push(RoleRule {
                role,
                terms,
                exclude,
            });
        }

        for row in read_csv_rows(rules_path, &["kind", "term", "canonical_role"])? {
            let kind = get_field(&row, "kind");
            let term = normalized_term(get_field(&row, "term"));
            if term.is_empty() {
                continue;
            }
            let role = || parse_role(rules_path, get_field(&row, "canonical_role"));
            match kind {
                "core" => taxonomy.core.push((term, role()?)),
                "context" => {
                    taxonomy.context.insert(term);
                }
                "leadership" => taxonomy.leadership.push((term, role()?)),
                "leadership_anchor" => {
                    taxonomy.leadership_anchor.insert(term);
                }
                "leadership_exclude" => {
                    taxonomy.leadership_exclude.insert(term);
                }
                "ai_marker" => taxonomy.ai_markers.push((term, role()?)),
                other => return Err(ReferenceError::illegal(rules_path, "role rule kind", other)),
            }
        }

        Ok(taxonomy)
    }

    /// Role whose canonical spelling or alias is exactly `raw`.
    pub fn exact(&self, raw: &str) -> Option<RoleName> {
        let key = normalized_term(raw);
        self.rules
            .iter()
            .find(|rule| rule.terms.contains(&key))
            .map(|rule| rule.role)
    }

    pub fn rule(&self, role: RoleName) -> Option<&RoleRule> {
        self.rules.iter().find(|rule| rule.role == role)
    }
}
