//! Value parsers shared by the normalizer and the extractor.

pub mod datetime;
pub mod numeric;

pub use datetime::parse_posted_date;
pub use numeric::{format_numeric, parse_amount, parse_count, parse_f64};
