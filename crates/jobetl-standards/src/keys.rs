//! Matching keys shared by every reference lookup.

/// Case-insensitive, whitespace-normalized key.
pub fn lookup_key(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Key that keeps only alphanumeric characters, lowercased.
///
/// Used by lenient matching so `"Full-time"`, `"full time"` and `"FULLTIME"`
/// meet on the same entry.
pub fn compact_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Lowercased tokens with punctuation and digits treated as separators.
///
/// Free-text matching (titles, descriptions) works on these tokens so a
/// keyword only matches whole words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphabetic())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Lowercased alphanumeric tokens; digits are kept.
pub fn word_tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Position of the first occurrence of `phrase` as a contiguous token run.
pub fn find_phrase(tokens: &[String], phrase: &[String]) -> Option<usize> {
    if phrase.is_empty() || phrase.len() > tokens.len() {
        return None;
    }
    tokens.windows(phrase.len()).position(|window| window == phrase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_key_collapses_whitespace() {
        assert_eq!(lookup_key("  Real   Estate "), "real estate");
    }

    #[test]
    fn compact_key_drops_punctuation() {
        assert_eq!(compact_key("Full-Time"), compact_key("full time"));
        assert_eq!(compact_key("Ph.D."), "phd");
        assert_eq!(compact_key("$"), "");
    }

    #[test]
    fn tokenize_splits_on_digits_and_symbols() {
        assert_eq!(tokenize("Sr. Data-Engineer (m/w/d) 2"), [
            "sr", "data", "engineer", "m", "w", "d"
        ]);
    }

    #[test]
    fn find_phrase_matches_whole_tokens() {
        let tokens = word_tokens("Fully remote, 100% remote-first team");
        assert_eq!(find_phrase(&tokens, &word_tokens("100% remote")), Some(2));
        assert_eq!(find_phrase(&tokens, &word_tokens("remote team")), None);
        assert_eq!(find_phrase(&word_tokens("payments"), &word_tokens("pay")), None);
    }
}
