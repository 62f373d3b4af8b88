//! Posted-date parsing.
//!
//! Sources deliver dates as ISO dates, ISO timestamps (with or without
//! offset), European and US slash dates, or month-name dates. Every accepted
//! form collapses to a calendar date.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d.%m.%Y", // 15.01.2024
    "%d/%m/%Y", // 15/01/2024
    "%m/%d/%Y", // 01/15/2024
    "%d-%m-%Y",
    "%d-%b-%Y",  // 15-Jan-2024
    "%b %d, %Y", // Jan 15, 2024
    "%B %d, %Y", // January 15, 2024
    "%d %b %Y",  // 15 Jan 2024
    "%d %B %Y",
    "%Y%m%d",
];

/// Parse a posted date. `None` means the value is unparseable.
///
/// Ambiguous slash dates read day-first; a month-first reading is only used
/// when the day-first one is impossible (e.g. `01/15/2024`).
pub fn parse_posted_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }
    None
}
