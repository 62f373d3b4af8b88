//! The explicit "not-available" sentinel.
//!
//! `Value<T>` is the only way a canonical field expresses absence. A
//! provider that did not supply a value yields [`Value::NotAvailable`]; an
//! empty string never stands in for it.

use std::fmt;

/// Wire form of the sentinel in every table and report.
pub const NOT_AVAILABLE: &str = "__NA__";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value<T> {
    NotAvailable,
    Known(T),
}

impl<T> Default for Value<T> {
    fn default() -> Self {
        Self::NotAvailable
    }
}

impl<T> Value<T> {
    pub fn is_na(&self) -> bool {
        matches!(self, Self::NotAvailable)
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    pub fn known(&self) -> Option<&T> {
        match self {
            Self::Known(value) => Some(value),
            Self::NotAvailable => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Known(value) => Some(value),
            Self::NotAvailable => None,
        }
    }

    pub fn as_ref(&self) -> Value<&T> {
        match self {
            Self::Known(value) => Value::Known(value),
            Self::NotAvailable => Value::NotAvailable,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Value<U> {
        match self {
            Self::Known(value) => Value::Known(f(value)),
            Self::NotAvailable => Value::NotAvailable,
        }
    }

    /// Fill a not-available slot; a known value is never replaced.
    ///
    /// Returns true when the slot changed.
    pub fn fill(&mut self, candidate: Value<T>) -> bool {
        if self.is_known() || candidate.is_na() {
            return false;
        }
        *self = candidate;
        true
    }

    pub fn reset(&mut self) {
        *self = Self::NotAvailable;
    }
}

impl<T> From<Option<T>> for Value<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Known(value),
            None => Self::NotAvailable,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(value) => value.fmt(f),
            Self::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl<T: serde::Serialize> serde::Serialize for Value<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Known(value) => value.serialize(serializer),
            Self::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

/// Interpret a raw cell: blank cells and the literal sentinel are absent.
pub fn raw_value(raw: &str) -> Value<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == NOT_AVAILABLE {
        Value::NotAvailable
    } else {
        Value::Known(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_only_replaces_sentinel() {
        let mut value = Value::Known("Berlin".to_string());
        assert!(!value.fill(Value::Known("Paris".to_string())));
        assert_eq!(value, Value::Known("Berlin".to_string()));

        let mut empty: Value<String> = Value::NotAvailable;
        assert!(!empty.fill(Value::NotAvailable));
        assert!(empty.fill(Value::Known("Paris".to_string())));
        assert_eq!(empty.known().map(String::as_str), Some("Paris"));
    }

    #[test]
    fn raw_value_treats_blank_and_sentinel_as_absent() {
        assert!(raw_value("   ").is_na());
        assert!(raw_value("__NA__").is_na());
        assert_eq!(raw_value(" x "), Value::Known("x".to_string()));
    }

    #[test]
    fn sentinel_serializes_as_marker() {
        let value: Value<u32> = Value::NotAvailable;
        assert_eq!(serde_json::to_string(&value).unwrap(), "\"__NA__\"");
        assert_eq!(serde_json::to_string(&Value::Known(3)).unwrap(), "3");
    }
}
