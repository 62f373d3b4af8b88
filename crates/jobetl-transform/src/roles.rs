//! Role-title standardization against the canonical role taxonomy.
//!
//! Matching runs in three tiers and stops at the first that yields a role:
//!
//! 1. phrase rules: a role's canonical spelling, aliases or strong terms
//!    appear in the title and none of its exclude tokens do (every matching
//!    role is kept)
//! 2. core words (`analyst`, `engineer`, ...) when the title carries a data
//!    context token; first core word in rule order wins
//! 3. data leadership titles (`head of data`, `chief data officer`), unless a
//!    hard-exclude token is present; an AI marker picks its own role
//!
//! A title that matches nothing yields an empty set. Roles are never invented
//! from the raw text.

use std::collections::BTreeSet;

use jobetl_model::RoleName;
use jobetl_standards::{RoleTaxonomy, tokenize};

/// Longest n-gram compared against single phrase terms.
const MAX_NGRAM: usize = 3;

pub fn match_roles(title: &str, taxonomy: &RoleTaxonomy) -> BTreeSet<RoleName> {
    let tokens = tokenize(title);
    if tokens.is_empty() {
        return BTreeSet::new();
    }
    let token_set: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();
    let phrases = ngrams(&tokens, MAX_NGRAM);
    let full_text = format!(" {} ", tokens.join(" "));

    let excluded = |role: RoleName| {
        taxonomy
            .rule(role)
            .is_some_and(|rule| rule.exclude.iter().any(|t| token_set.contains(t.as_str())))
    };

    let found: BTreeSet<RoleName> = taxonomy
        .rules
        .iter()
        .filter(|rule| {
            rule.terms.iter().any(|term| {
                phrases.contains(term.as_str())
                    || (term.contains(' ') && full_text.contains(&format!(" {term} ")))
            })
        })
        .filter(|rule| !excluded(rule.role))
        .map(|rule| rule.role)
        .collect();
    if !found.is_empty() {
        return found;
    }

    let has_context = taxonomy
        .context
        .iter()
        .any(|term| token_set.contains(term.as_str()));
    if has_context {
        let core = taxonomy
            .core
            .iter()
            .filter(|(word, _)| token_set.contains(word.as_str()))
            .find(|(_, role)| !excluded(*role));
        if let Some((_, role)) = core {
            return BTreeSet::from([*role]);
        }
    }

    let anchored = taxonomy
        .leadership_anchor
        .iter()
        .any(|term| token_set.contains(term.as_str()));
    let hard_excluded = taxonomy
        .leadership_exclude
        .iter()
        .any(|term| token_set.contains(term.as_str()));
    if anchored && !hard_excluded {
        let leadership = taxonomy
            .leadership
            .iter()
            .find(|(word, _)| token_set.contains(word.as_str()));
        if let Some((_, role)) = leadership {
            let role = taxonomy
                .ai_markers
                .iter()
                .find(|(marker, _)| token_set.contains(marker.as_str()))
                .map_or(*role, |(_, marker_role)| *marker_role);
            return BTreeSet::from([role]);
        }
    }

    BTreeSet::new()
}

/// Every contiguous token run of length `1..=max`, space-joined.
pub(crate) fn ngrams(tokens: &[String], max: usize) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for start in 0..tokens.len() {
        for end in start + 1..=(start + max).min(tokens.len()) {
            out.insert(tokens[start..end].join(" "));
        }
    }
    out
}
