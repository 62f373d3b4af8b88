//! Keyword lists used when scanning free text.

use std::path::Path;

use jobetl_model::{Enumerated, RemoteOption};

use crate::csv_utils::{get_field, read_csv_rows};
use crate::error::ReferenceError;
use crate::keys::word_tokens;

/// Keyword phrases in table order, each as its word tokens.
#[derive(Debug, Clone, Default)]
pub struct SignalKeywords {
    /// First listed keyword found in the text wins.
    pub remote: Vec<(Vec<String>, RemoteOption)>,
    pub salary_indicators: Vec<Vec<String>>,
    /// Words that mark a nearby amount as something other than pay.
    pub salary_exclude: Vec<Vec<String>>,
}

impl SignalKeywords {
    pub fn load(path: &Path) -> Result<Self, ReferenceError> {
        let mut keywords = Self::default();
        for row in read_csv_rows(path, &["signal", "keyword", "canonical"])? {
            let phrase = word_tokens(get_field(&row, "keyword"));
            if phrase.is_empty() {
                continue;
            }
            match get_field(&row, "signal") {
                "remote" => {
                    let cell = get_field(&row, "canonical");
                    let option = RemoteOption::from_canonical(cell).ok_or_else(|| {
                        ReferenceError::illegal(path, RemoteOption::FIELD.name(), cell)
                    })?;
                    keywords.remote.push((phrase, option));
                }
                "salary_indicator" => keywords.salary_indicators.push(phrase),
                "salary_exclude" => keywords.salary_exclude.push(phrase),
                other => return Err(ReferenceError::illegal(path, "signal", other)),
            }
        }
        Ok(keywords)
    }

    pub fn len(&self) -> usize {
        self.remote.len() + self.salary_indicators.len() + self.salary_exclude.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
