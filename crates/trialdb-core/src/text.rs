// crates/trialdb-core/src/text.rs

//! Free-text helpers for the query front-ends: postal-code recognition
//! and keyword normalization.

use deunicode::deunicode;

const POSTAL_CODE_LEN: usize = 5;

/// Whether the text is exactly one five-digit postal code, allowing
/// surrounding whitespace.
pub fn is_postal_code(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.len() == POSTAL_CODE_LEN && trimmed.bytes().all(|b| b.is_ascii_digit())
}

/// First five-digit run found in the text, if any.
pub fn extract_postal_code(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut start = None;
    for (i, b) in bytes.iter().enumerate() {
        if b.is_ascii_digit() {
            let s = *start.get_or_insert(i);
            if i - s + 1 == POSTAL_CODE_LEN {
                return Some(&text[s..=i]);
            }
        } else {
            start = None;
        }
    }
    None
}

/// Normalizes free text into keyword tokens the way the upstream
/// backend does: transliterate to ASCII, lowercase, turn punctuation
/// into separators, split, drop empties.
pub fn normalize_keywords(input: &str) -> Vec<String> {
    deunicode(input)
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Parses a `keywords: …` style message into its keyword list.
///
/// Returns `None` when the message does not carry the keyword prefix,
/// and `Some(vec![])` when the prefix is there but no usable keywords
/// follow, which callers treat as a malformed keyword request.
pub fn parse_keyword_message(text: &str) -> Option<Vec<String>> {
    let trimmed = text.trim_start();
    if !trimmed.to_ascii_lowercase().starts_with("keyword") {
        return None;
    }
    let keywords = match trimmed.find(':') {
        Some(colon) => normalize_keywords(&trimmed[colon + 1..]),
        None => Vec::new(),
    };
    Some(keywords)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postal_code_recognition() {
        assert!(is_postal_code("90210"));
        assert!(is_postal_code("  90210  "));
        assert!(!is_postal_code("9021"));
        assert!(!is_postal_code("902100"));
        assert!(!is_postal_code("9021a"));
        assert!(!is_postal_code("send to 90210"));
    }

    #[test]
    fn postal_code_extraction() {
        assert_eq!(extract_postal_code("zip is 10001, thanks"), Some("10001"));
        assert_eq!(extract_postal_code("10001"), Some("10001"));
        assert_eq!(extract_postal_code("no digits here"), None);
        assert_eq!(extract_postal_code("1234"), None);
        // A longer digit run yields its first five digits.
        assert_eq!(extract_postal_code("123456"), Some("12345"));
    }

    #[test]
    fn keyword_normalization() {
        assert_eq!(
            normalize_keywords("Vaccine, remdesivir; PLASMA"),
            ["vaccine", "remdesivir", "plasma"]
        );
        assert_eq!(normalize_keywords("  "), Vec::<String>::new());
        assert_eq!(normalize_keywords("Québec"), ["quebec"]);
    }

    #[test]
    fn keyword_message_parsing() {
        assert_eq!(
            parse_keyword_message("Keywords: vaccine, plasma"),
            Some(vec!["vaccine".to_string(), "plasma".to_string()])
        );
        assert_eq!(
            parse_keyword_message("  keyword: remdesivir"),
            Some(vec!["remdesivir".to_string()])
        );
        // Prefix without a colon is malformed, not absent.
        assert_eq!(parse_keyword_message("keywords vaccine"), Some(vec![]));
        assert_eq!(parse_keyword_message("90210"), None);
    }
}
