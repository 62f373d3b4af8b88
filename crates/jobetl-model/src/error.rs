use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown canonical field: {0}")]
    UnknownField(String),
    #[error("'{value}' is not a member of the {field} enumeration")]
    NotInEnumeration { field: &'static str, value: String },
    #[error("invalid currency code: {0}")]
    InvalidCurrencyCode(String),
    #[error("invalid source name: {0}")]
    InvalidSourceName(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
