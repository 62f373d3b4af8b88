use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    /// A pattern built from reference spellings failed to compile.
    #[error("failed to compile {family} pattern: {source}")]
    Pattern {
        family: &'static str,
        #[source]
        source: regex::Error,
    },
}

impl TransformError {
    pub(crate) fn pattern(family: &'static str) -> impl FnOnce(regex::Error) -> Self {
        move |source| Self::Pattern { family, source }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
