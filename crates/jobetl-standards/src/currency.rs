//! Currency spellings and the fixed rate table.

use std::collections::BTreeMap;
use std::path::Path;

use jobetl_model::{CurrencyCode, Field, MatchingMode, Value};

use crate::csv_utils::{get_field, parse_number, read_csv_rows};
use crate::error::ReferenceError;
use crate::table::{AliasTable, parse_canonical};

#[derive(Debug, Clone, Default)]
pub struct CurrencyReference {
    spellings: AliasTable<CurrencyCode>,
    rates_to_usd: BTreeMap<CurrencyCode, f64>,
}

impl CurrencyReference {
    pub fn load(currencies_path: &Path, rates_path: &Path) -> Result<Self, ReferenceError> {
        let mut reference = Self::default();
        let field = Field::Currency.name();

        for row in read_csv_rows(rates_path, &["currency", "rate_to_usd"])? {
            let cell = get_field(&row, "currency");
            let code = CurrencyCode::new(cell)
                .map_err(|_| ReferenceError::illegal(rates_path, field, cell))?;
            let rate: f64 = parse_number(rates_path, "rate_to_usd", get_field(&row, "rate_to_usd"))?;
            if !rate.is_finite() || rate <= 0.0 {
                return Err(ReferenceError::InvalidNumber {
                    path: rates_path.to_path_buf(),
                    column: "rate_to_usd".to_string(),
                    value: rate.to_string(),
                });
            }
            reference.rates_to_usd.insert(code, rate);
        }

        for row in read_csv_rows(currencies_path, &["alias", "canonical"])? {
            let value = parse_canonical(currencies_path, field, get_field(&row, "canonical"), |cell| {
                CurrencyCode::new(cell).ok()
            })?;
            if let Value::Known(code) = &value {
                if !reference.rates_to_usd.contains_key(code) {
                    return Err(ReferenceError::MissingRate {
                        currency: code.to_string(),
                    });
                }
                reference
                    .spellings
                    .insert(currencies_path, code.as_str(), value.clone())?;
            }
            reference
                .spellings
                .insert(currencies_path, get_field(&row, "alias"), value)?;
        }
        Ok(reference)
    }

    pub fn resolve(&self, raw: &str, mode: MatchingMode) -> Option<&Value<CurrencyCode>> {
        self.spellings.lookup(raw, mode)
    }

    pub fn rate_to_usd(&self, code: &CurrencyCode) -> Option<f64> {
        self.rates_to_usd.get(code).copied()
    }

    /// Amount converted with the fixed rate; `None` when no rate is known.
    pub fn to_usd(&self, amount: f64, code: &CurrencyCode) -> Option<f64> {
        self.rate_to_usd(code).map(|rate| amount * rate)
    }

    /// Known spellings (lookup keys) with their currency, for text scanning.
    pub fn spellings(&self) -> impl Iterator<Item = (&str, &CurrencyCode)> {
        self.spellings
            .entries()
            .filter_map(|(spelling, value)| value.known().map(|code| (spelling, code)))
    }

    pub fn len(&self) -> usize {
        self.rates_to_usd.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates_to_usd.is_empty()
    }
}
