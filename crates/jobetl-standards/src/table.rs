//! Alias tables: raw spelling to canonical value, scoped to one field.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;
use std::path::Path;

use jobetl_model::{Enumerated, MatchingMode, NOT_AVAILABLE, Value};

use crate::csv_utils::{get_field, read_csv_rows};
use crate::error::ReferenceError;
use crate::keys::{compact_key, lookup_key};

/// Immutable lookup from observed spellings to a canonical value.
///
/// A canonical value of [`Value::NotAvailable`] is a legitimate match: the
/// raw spelling is known and explicitly means "not specified".
#[derive(Debug, Clone)]
pub struct AliasTable<T> {
    exact: BTreeMap<String, Value<T>>,
    /// `None` marks a compact key shared by entries with different values.
    compact: BTreeMap<String, Option<Value<T>>>,
}

impl<T> Default for AliasTable<T> {
    fn default() -> Self {
        Self {
            exact: BTreeMap::new(),
            compact: BTreeMap::new(),
        }
    }
}

impl<T: Clone + PartialEq + fmt::Display> AliasTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `alias`. Re-registering the same value is a no-op.
    pub fn insert(&mut self, path: &Path, alias: &str, value: Value<T>) -> Result<(), ReferenceError> {
        let key = lookup_key(alias);
        if key.is_empty() {
            return Ok(());
        }
        match self.exact.entry(key) {
            Entry::Occupied(existing) => {
                if existing.get() != &value {
                    return Err(ReferenceError::ConflictingAlias {
                        path: path.to_path_buf(),
                        alias: alias.to_string(),
                        first: existing.get().to_string(),
                        second: value.to_string(),
                    });
                }
                return Ok(());
            }
            Entry::Vacant(slot) => {
                slot.insert(value.clone());
            }
        }

        let compact = compact_key(alias);
        if compact.is_empty() {
            return Ok(());
        }
        match self.compact.entry(compact) {
            Entry::Vacant(slot) => {
                slot.insert(Some(value));
            }
            Entry::Occupied(mut slot) => {
                if slot.get().as_ref() != Some(&value) {
                    slot.insert(None);
                }
            }
        }
        Ok(())
    }

    /// `None` when the raw spelling is unknown to the table.
    pub fn lookup(&self, raw: &str, mode: MatchingMode) -> Option<&Value<T>> {
        if let Some(value) = self.exact.get(&lookup_key(raw)) {
            return Some(value);
        }
        match mode {
            MatchingMode::Strict => None,
            MatchingMode::Lenient => self
                .compact
                .get(&compact_key(raw))
                .and_then(Option::as_ref),
        }
    }

    /// Number of distinct spellings.
    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }

    /// Every known spelling (as a lookup key) with its value.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value<T>)> {
        self.exact.iter().map(|(key, value)| (key.as_str(), value))
    }
}

/// Parse a canonical cell: the sentinel spelling is an explicit not-available.
pub(crate) fn parse_canonical<T>(
    path: &Path,
    field: &str,
    cell: &str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<Value<T>, ReferenceError> {
    if cell == NOT_AVAILABLE {
        return Ok(Value::NotAvailable);
    }
    parse(cell)
        .map(Value::Known)
        .ok_or_else(|| ReferenceError::illegal(path, field, cell))
}

/// Load an `alias,canonical` table for a closed enumeration.
///
/// Every member's canonical spelling is registered as its own alias.
pub fn load_enum_table<E>(path: &Path) -> Result<AliasTable<E>, ReferenceError>
where
    E: Enumerated + PartialEq + fmt::Display,
{
    let field = E::FIELD.name();
    let mut table = AliasTable::new();
    for member in E::all() {
        table.insert(path, member.as_str(), Value::Known(*member))?;
    }
    for row in read_csv_rows(path, &["alias", "canonical"])? {
        let value = parse_canonical(path, field, get_field(&row, "canonical"), E::from_canonical)?;
        table.insert(path, get_field(&row, "alias"), value)?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use jobetl_model::Industry;

    use super::*;

    fn table() -> AliasTable<Industry> {
        let path = PathBuf::from("industries.csv");
        let mut table = AliasTable::new();
        table
            .insert(&path, "Real Estate", Value::Known(Industry::RealEstate))
            .unwrap();
        table
            .insert(&path, "fintech", Value::Known(Industry::Finance))
            .unwrap();
        table
    }

    #[test]
    fn strict_lookup_ignores_case_and_spacing() {
        let table = table();
        assert_eq!(
            table.lookup("  REAL   estate", MatchingMode::Strict),
            Some(&Value::Known(Industry::RealEstate))
        );
        assert_eq!(table.lookup("real-estate", MatchingMode::Strict), None);
    }

    #[test]
    fn lenient_lookup_uses_compact_key() {
        let table = table();
        assert_eq!(
            table.lookup("real-estate", MatchingMode::Lenient),
            Some(&Value::Known(Industry::RealEstate))
        );
        assert_eq!(
            table.lookup("Fin Tech", MatchingMode::Lenient),
            Some(&Value::Known(Industry::Finance))
        );
    }

    #[test]
    fn conflicting_alias_is_rejected() {
        let mut table = table();
        let err = table
            .insert(
                &PathBuf::from("industries.csv"),
                "FINTECH",
                Value::Known(Industry::Banking),
            )
            .unwrap_err();
        assert!(matches!(err, ReferenceError::ConflictingAlias { .. }));
    }

    #[test]
    fn ambiguous_compact_key_never_matches() {
        let path = PathBuf::from("industries.csv");
        let mut table = table();
        table
            .insert(&path, "e commerce", Value::Known(Industry::ECommerce))
            .unwrap();
        table
            .insert(&path, "E.Commerce", Value::Known(Industry::Retail))
            .unwrap();
        assert_eq!(table.lookup("ecommerce", MatchingMode::Lenient), None);
        assert_eq!(
            table.lookup("e commerce", MatchingMode::Lenient),
            Some(&Value::Known(Industry::ECommerce))
        );
    }
}
