/// Shared token length bounds for the index and for queries.
pub const MIN_TOKEN_LEN: usize = 3;
pub const MAX_TOKEN_LEN: usize = 32;

/// Index-side tokenizer: split extracted text on ASCII whitespace and keep
/// words of valid length that are at least 70% alphabetic. Accepted tokens
/// are lowercased.
pub fn extract_words(text: &str) -> Vec<String> {
    text.split_ascii_whitespace()
        .filter(|word| is_valid_word(word))
        .map(|word| word.to_lowercase())
        .collect()
}

fn is_valid_word(word: &str) -> bool {
    let len = word.chars().count();
    if !(MIN_TOKEN_LEN..=MAX_TOKEN_LEN).contains(&len) {
        return false;
    }
    let letters = word.chars().filter(|c| c.is_ascii_alphabetic()).count();
    letters as f64 >= len as f64 * 0.7
}

/// Query-side tokenizer: strips non-alphanumeric characters inside each word
/// before the length filter, so punctuated queries still match. Kept distinct
/// from [`extract_words`]; a query term that would fail the 70% rule is still
/// searchable.
pub fn parse_query(query: &str) -> Vec<String> {
    query
        .split_ascii_whitespace()
        .filter_map(|word| {
            let clean: String = word
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .map(|c| c.to_ascii_lowercase())
                .collect();
            (MIN_TOKEN_LEN..=MAX_TOKEN_LEN)
                .contains(&clean.chars().count())
                .then_some(clean)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_words_filters_and_lowercases() {
        let words = extract_words("The Quick BROWN fx jumped over");
        assert_eq!(words, vec!["the", "quick", "brown", "jumped", "over"]);
    }

    #[test]
    fn test_extract_words_length_bounds() {
        let long = "a".repeat(33);
        let max = "b".repeat(32);
        let text = format!("ab abc {} {}", long, max);
        assert_eq!(extract_words(&text), vec!["abc".to_string(), max]);
    }

    #[test]
    fn test_extract_words_seventy_percent_rule() {
        // 7 letters of 10 chars passes, 6 of 10 fails
        assert_eq!(extract_words("abcdefg123"), vec!["abcdefg123"]);
        assert!(extract_words("abcdef1234").is_empty());
        assert!(extract_words("12345").is_empty());
    }

    #[test]
    fn test_parse_query_strips_punctuation() {
        assert_eq!(
            parse_query("Hello, World! C++"),
            vec!["hello", "world"]
        );
    }

    #[test]
    fn test_parse_query_keeps_numeric_terms() {
        // the 70% alphabetic rule does not apply to queries
        assert_eq!(parse_query("404 errors"), vec!["404", "errors"]);
    }

    #[test]
    fn test_parse_query_length_bounds() {
        assert!(parse_query("ab a1").is_empty());
        assert_eq!(parse_query("abc"), vec!["abc"]);
    }

    #[test]
    fn test_parse_query_empty() {
        assert!(parse_query("").is_empty());
        assert!(parse_query("   ").is_empty());
    }
}
