use std::path::PathBuf;

/// Failure to load the reference tables. Every variant halts the run.
#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML manifest {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid manifest: {message}")]
    InvalidManifest { message: String },

    #[error("missing required role in manifest: {role}")]
    MissingRole { role: String },

    #[error("duplicate role in manifest: {role}")]
    DuplicateRole { role: String },

    #[error("missing file listed in manifest: {path}")]
    MissingFile { path: PathBuf },

    #[error("invalid sha256 for {path}: {message}")]
    InvalidSha256 { path: PathBuf, message: String },

    #[error("sha256 mismatch for {path} (expected {expected}, got {actual})")]
    Sha256Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("failed to parse CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    #[error("{path}: missing column '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error("{path}: '{value}' is not a legal {field} value")]
    IllegalCanonical {
        path: PathBuf,
        field: String,
        value: String,
    },

    #[error("{path}: alias '{alias}' maps to both '{first}' and '{second}'")]
    ConflictingAlias {
        path: PathBuf,
        alias: String,
        first: String,
        second: String,
    },

    #[error("{path}: invalid number '{value}' in column '{column}'")]
    InvalidNumber {
        path: PathBuf,
        column: String,
        value: String,
    },

    #[error("{path}: unknown country '{country}'")]
    UnknownCountry { path: PathBuf, country: String },

    #[error("no exchange rate for currency {currency}")]
    MissingRate { currency: String },
}

impl ReferenceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn illegal(path: &std::path::Path, field: &str, value: &str) -> Self {
        Self::IllegalCanonical {
            path: path.to_path_buf(),
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}
