//! Signal extraction from the free-text job description.
//!
//! Extraction runs on the mapped [`RawRecord`] before normalization and only
//! fills fields that are still the sentinel. Every filled value is written in
//! its canonical spelling so the normalizer resolves it like any structured
//! value.
//!
//! Precedence inside one text is fixed:
//! - gazetteer matches (city, country): earliest position, then longest phrase
//! - remote keywords: keyword table order
//! - salary: explicit range next to a currency, then a single amount next to
//!   a currency with a salary word nearby; first acceptable match by position
//! - experience: first `N years` pattern, lower bound of a range

use std::sync::LazyLock;

use jobetl_model::{CurrencyCode, Field, RawRecord, Value};
use jobetl_standards::{ReferenceRegistry, find_phrase, word_tokens};
use regex::{Captures, Regex};
use tracing::trace;

use crate::error::{Result, TransformError};
use crate::normalization::numeric::{format_numeric, parse_grouped_number};

const AMOUNT: &str = r"\d{1,3}(?:[.,]\d{3})+(?:\.\d+)?|\d+(?:[.,]\d+)?";

/// Characters inspected before a salary candidate for context words.
const CONTEXT_BEFORE: usize = 40;
/// Characters inspected after a single-amount candidate for indicator words.
const CONTEXT_AFTER: usize = 20;

/// A single amount below this is never read as pay.
const MIN_SINGLE_AMOUNT: f64 = 100.0;
const MAX_RANGE_SPREAD: f64 = 10_000_000.0;

static EXPERIENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})\s*\+?\s*(?:(?:-|–|to)\s*(\d{1,2})\s*\+?\s*)?(?:years?|yrs?)\b")
        .expect("valid experience regex")
});

/// Lower bound of the first `N years` / `N-M yrs` / `N+ years` pattern.
pub fn experience_years(text: &str) -> Option<f64> {
    let caps = EXPERIENCE_RE.captures(text)?;
    caps.get(1)?.as_str().parse::<f64>().ok()
}

/// Salary recovered from text, amounts as written (not annualized).
#[derive(Debug, Clone, PartialEq)]
pub struct SalarySignal {
    pub min: f64,
    pub max: f64,
    pub currency: CurrencyCode,
}

/// Pattern and gazetteer library built once from the reference tables.
#[derive(Debug)]
pub struct SignalExtractor<'r> {
    registry: &'r ReferenceRegistry,
    cities: Vec<(Vec<String>, String)>,
    countries: Vec<(Vec<String>, String)>,
    salary_range: Regex,
    salary_single: Regex,
}

impl<'r> SignalExtractor<'r> {
    pub fn new(registry: &'r ReferenceRegistry) -> Result<Self> {
        let cities = registry
            .geo
            .city_spellings()
            .map(|(spelling, city)| (word_tokens(spelling), city.to_string()))
            .filter(|(phrase, _)| !phrase.is_empty())
            .collect();
        let countries = registry
            .geo
            .countries()
            .iter()
            .map(|country| (word_tokens(&country.name), country.name.clone()))
            .filter(|(phrase, _)| !phrase.is_empty())
            .collect();

        let currency = currency_alternation(registry);
        let salary_range = Regex::new(&format!(
            r"(?i)(?:(?P<c1>{currency})\s*)?\b(?P<lo>{AMOUNT})\s*(?P<lok>k\b)?\s*(?:-|–|—|to)\s*(?:(?:{currency})\s*)?\b(?P<hi>{AMOUNT})\s*(?P<hik>k\b)?(?:\s*(?P<c2>{currency}))?"
        ))
        .map_err(TransformError::pattern("salary range"))?;
        let salary_single = Regex::new(&format!(
            r"(?i)(?P<c1>{currency})\s*\b(?P<a1>{AMOUNT})\s*(?P<k1>k\b)?|\b(?P<a2>{AMOUNT})\s*(?P<k2>k\b)?\s*(?P<c2>{currency})"
        ))
        .map_err(TransformError::pattern("single salary"))?;

        Ok(Self {
            registry,
            cities,
            countries,
            salary_range,
            salary_single,
        })
    }

    /// Fill sentinel fields of `record` from its description.
    ///
    /// Returns the number of fields filled.
    pub fn extract(&self, record: &mut RawRecord) -> usize {
        let Some(text) = record.text(Field::JobDescription).map(str::to_owned) else {
            return 0;
        };
        let tokens = word_tokens(&text);
        let mut filled = 0;

        if record.get(Field::City).is_na()
            && let Some(city) = earliest_phrase(&tokens, &self.cities)
        {
            filled += usize::from(record.fill_extracted(Field::City, city));
        }
        if record.get(Field::Country).is_na()
            && let Some(country) = earliest_phrase(&tokens, &self.countries)
        {
            filled += usize::from(record.fill_extracted(Field::Country, country));
        }
        if record.get(Field::RemoteOption).is_na()
            && let Some(option) = self.remote_option(&tokens)
        {
            filled += usize::from(record.fill_extracted(Field::RemoteOption, option));
        }

        if record.get(Field::MinSalary).is_na()
            && record.get(Field::MaxSalary).is_na()
            && let Some(salary) = self.salary(&text)
        {
            let stated = record
                .text(Field::Currency)
                .and_then(|raw| self.currency(raw));
            if stated.is_none_or(|code| code == salary.currency) {
                filled += usize::from(record.fill_extracted(Field::MinSalary, format_numeric(salary.min)));
                filled += usize::from(record.fill_extracted(Field::MaxSalary, format_numeric(salary.max)));
                filled += usize::from(record.fill_extracted(Field::Currency, salary.currency.as_str()));
            } else {
                trace!(row = record.lineage.row, "salary currency disagrees with record currency");
            }
        }

        if record.get(Field::RequiredExpYears).is_na()
            && let Some(years) = experience_years(&text)
        {
            filled += usize::from(record.fill_extracted(Field::RequiredExpYears, format_numeric(years)));
        }

        filled
    }

    pub fn remote_option(&self, tokens: &[String]) -> Option<&'static str> {
        self.registry
            .signals
            .remote
            .iter()
            .find(|(phrase, _)| find_phrase(tokens, phrase).is_some())
            .map(|(_, option)| option.as_str())
    }

    /// First acceptable salary in `text`, range family before single amounts.
    pub fn salary(&self, text: &str) -> Option<SalarySignal> {
        self.salary_range
            .captures_iter(text)
            .find_map(|caps| self.accept_range(text, &caps))
            .or_else(|| {
                self.salary_single
                    .captures_iter(text)
                    .find_map(|caps| self.accept_single(text, &caps))
            })
    }

    fn accept_range(&self, text: &str, caps: &Captures<'_>) -> Option<SalarySignal> {
        let whole = caps.get(0)?;
        let currency = caps
            .name("c1")
            .or_else(|| caps.name("c2"))
            .and_then(|m| self.currency(m.as_str()))?;
        let hi_k = caps.name("hik").is_some();
        let lo_k = caps.name("lok").is_some() || hi_k;
        let lo = scaled(caps.name("lo")?.as_str(), lo_k)?;
        let hi = scaled(caps.name("hi")?.as_str(), hi_k)?;
        if lo <= 0.0 || lo > hi || hi - lo > MAX_RANGE_SPREAD {
            return None;
        }
        if self.has_phrase(window(text, whole.start(), CONTEXT_BEFORE, 0), &self.registry.signals.salary_exclude) {
            return None;
        }
        Some(SalarySignal {
            min: lo,
            max: hi,
            currency,
        })
    }

    fn accept_single(&self, text: &str, caps: &Captures<'_>) -> Option<SalarySignal> {
        let whole = caps.get(0)?;
        let (currency, amount, k) = match caps.name("a1") {
            Some(amount) => (caps.name("c1")?, amount, caps.name("k1").is_some()),
            None => (caps.name("c2")?, caps.name("a2")?, caps.name("k2").is_some()),
        };
        let currency = self.currency(currency.as_str())?;
        let amount = scaled(amount.as_str(), k)?;
        if amount < MIN_SINGLE_AMOUNT {
            return None;
        }
        let signals = &self.registry.signals;
        if self.has_phrase(window(text, whole.start(), CONTEXT_BEFORE, 0), &signals.salary_exclude) {
            return None;
        }
        let surrounding = window_around(text, whole.start(), whole.end());
        if !self.has_phrase(surrounding, &signals.salary_indicators) {
            return None;
        }
        Some(SalarySignal {
            min: amount,
            max: amount,
            currency,
        })
    }

    fn currency(&self, raw: &str) -> Option<CurrencyCode> {
        match self.registry.currencies.resolve(raw, self.registry.mode())? {
            Value::Known(code) => Some(code.clone()),
            Value::NotAvailable => None,
        }
    }

    fn has_phrase(&self, text: &str, phrases: &[Vec<String>]) -> bool {
        let tokens = word_tokens(text);
        phrases
            .iter()
            .any(|phrase| find_phrase(&tokens, phrase).is_some())
    }
}

/// Regex alternation over every currency spelling, longest first so `us$`
/// wins over `$`.
fn currency_alternation(registry: &ReferenceRegistry) -> String {
    let mut spellings: Vec<&str> = registry
        .currencies
        .spellings()
        .map(|(spelling, _)| spelling)
        .filter(|spelling| !spelling.is_empty())
        .collect();
    spellings.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
    spellings.dedup();
    spellings
        .iter()
        .map(|spelling| {
            let escaped = regex::escape(spelling);
            if spelling.chars().all(char::is_alphabetic) {
                format!(r"\b{escaped}\b")
            } else {
                escaped
            }
        })
        .collect::<Vec<_>>()
        .join("|")
}

fn scaled(raw: &str, thousands: bool) -> Option<f64> {
    let amount = parse_grouped_number(raw)?;
    Some(if thousands { amount * 1000.0 } else { amount })
}

/// Earliest phrase occurrence; longer phrases win at the same position.
fn earliest_phrase<'a>(tokens: &[String], gazetteer: &'a [(Vec<String>, String)]) -> Option<&'a str> {
    gazetteer
        .iter()
        .filter_map(|(phrase, name)| {
            find_phrase(tokens, phrase).map(|pos| (pos, std::cmp::Reverse(phrase.len()), name))
        })
        .min_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)))
        .map(|(_, _, name)| name.as_str())
}

/// Up to `before` characters ending at byte `start`, plus `after` characters
/// from `start`.
fn window(text: &str, start: usize, before: usize, after: usize) -> &str {
    let from = if before == 0 {
        start
    } else {
        text[..start]
            .char_indices()
            .rev()
            .nth(before - 1)
            .map_or(0, |(idx, _)| idx)
    };
    let to = text[start..]
        .char_indices()
        .nth(after)
        .map_or(text.len(), |(idx, _)| start + idx);
    &text[from..to]
}

fn window_around(text: &str, start: usize, end: usize) -> &str {
    let from = start - window(text, start, CONTEXT_BEFORE, 0).len();
    let to = text[end..]
        .char_indices()
        .nth(CONTEXT_AFTER)
        .map_or(text.len(), |(idx, _)| end + idx);
    &text[from..to]
}
