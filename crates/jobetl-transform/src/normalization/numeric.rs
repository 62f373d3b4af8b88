//! Numeric normalization utilities.

/// Parses a plain number, returning None for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a money amount as written in source data.
///
/// Accepts thousands separators (`120,000` / `120.000`), a decimal comma,
/// surrounding currency symbols and a `k` suffix. A minus sign before the
/// digits (`-90000`, `-$5`, `$ -5`) is kept.
pub fn parse_amount(value: &str) -> Option<f64> {
    let value = value.trim();
    let start = value.find(|c: char| c.is_ascii_digit())?;
    let (prefix, rest) = value.split_at(start);
    let sign = if prefix.contains(['-', '\u{2212}']) { -1.0 } else { 1.0 };
    let trimmed = rest.trim_end_matches(|c: char| !c.is_ascii_digit() && c != 'k' && c != 'K');
    let (digits, multiplier) = match trimmed.strip_suffix(['k', 'K']) {
        Some(rest) => (rest.trim_end(), 1000.0),
        None => (trimmed, 1.0),
    };
    if digits.is_empty() {
        return None;
    }
    parse_grouped_number(digits).map(|v| sign * v * multiplier)
}

/// Number with optional thousands grouping; a single `,` or `.` followed by
/// other than three digits is a decimal separator.
pub fn parse_grouped_number(digits: &str) -> Option<f64> {
    let separators: Vec<(usize, char)> = digits
        .char_indices()
        .filter(|(_, c)| *c == ',' || *c == '.')
        .collect();
    if digits
        .chars()
        .any(|c| !(c.is_ascii_digit() || c == ',' || c == '.' || c == ' '))
    {
        return None;
    }
    let compact: String = digits.chars().filter(|c| *c != ' ').collect();

    let normalized = match separators.as_slice() {
        [] => compact,
        [(idx, sep)] => {
            let tail = digits.len() - idx - 1;
            if tail == 3 && *sep == ',' || tail == 3 && digits[..*idx].len() <= 3 && *sep == '.' {
                compact.replace(*sep, "")
            } else {
                compact.replace(',', ".")
            }
        }
        [.., (last_idx, last)] => {
            let grouping = separators[0].1;
            if separators.iter().all(|(_, c)| *c == grouping) {
                compact.replace(grouping, "")
            } else {
                // 1.234,56 or 1,234.56
                let (int_part, frac) = compact.split_at(*last_idx);
                let int_part: String = int_part.chars().filter(char::is_ascii_digit).collect();
                format!("{int_part}.{}", &frac[last.len_utf8()..])
            }
        }
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a non-negative whole count such as a population.
pub fn parse_count(value: &str) -> Option<u64> {
    let amount = parse_grouped_number(value.trim())
        .or_else(|| parse_f64(value))?;
    if amount < 0.0 || amount.fract() != 0.0 || amount > u64::MAX as f64 {
        return None;
    }
    Some(amount as u64)
}

/// Formats a floating-point number without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_with_grouping_and_suffix() {
        assert_eq!(parse_amount("120000"), Some(120_000.0));
        assert_eq!(parse_amount("120,000"), Some(120_000.0));
        assert_eq!(parse_amount("120.000"), Some(120_000.0));
        assert_eq!(parse_amount("1.234.567"), Some(1_234_567.0));
        assert_eq!(parse_amount("1,234.50"), Some(1_234.5));
        assert_eq!(parse_amount("1.234,50"), Some(1_234.5));
        assert_eq!(parse_amount("$85k"), Some(85_000.0));
        assert_eq!(parse_amount("45.5"), Some(45.5));
        assert_eq!(parse_amount("€ 3,5"), Some(3.5));
        assert_eq!(parse_amount("n/a"), None);
        assert_eq!(parse_amount("12 weeks"), None);
    }

    #[test]
    fn amounts_keep_their_sign() {
        assert_eq!(parse_amount("-90000"), Some(-90_000.0));
        assert_eq!(parse_amount(" -110,000 "), Some(-110_000.0));
        assert_eq!(parse_amount("-$5k"), Some(-5_000.0));
        assert_eq!(parse_amount("$ -5"), Some(-5.0));
        assert_eq!(parse_amount("-"), None);
    }

    #[test]
    fn counts_must_be_whole() {
        assert_eq!(parse_count("83,200,000"), Some(83_200_000));
        assert_eq!(parse_count("5100000"), Some(5_100_000));
        assert_eq!(parse_count("-3"), None);
        assert_eq!(parse_count("2.5"), None);
    }

    #[test]
    fn format_numeric_trims_zeros() {
        assert_eq!(format_numeric(120000.0), "120000");
        assert_eq!(format_numeric(12.50), "12.5");
    }
}
