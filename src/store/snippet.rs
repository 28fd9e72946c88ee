/// Window of content returned with each search hit.
const SNIPPET_WINDOW: usize = 200;
/// How far before the first term hit the window starts.
const SNIPPET_LEAD: usize = 100;

/// Excerpt of `content` centred on the first occurrence of any search term.
///
/// Terms arrive already lowercased from the query tokenizer; only the
/// content is lowered for the scan, ASCII-wise so byte offsets stay aligned
/// with the original text.
pub fn generate_snippet(content: &str, terms: &[String]) -> String {
    if content.len() <= SNIPPET_WINDOW {
        return content.to_string();
    }

    let lowered = content.to_ascii_lowercase();
    for term in terms {
        let Some(pos) = lowered.find(term.as_str()) else {
            continue;
        };

        let start = floor_char_boundary(content, pos.saturating_sub(SNIPPET_LEAD));
        let end = ceil_char_boundary(content, (start + SNIPPET_WINDOW).min(content.len()));

        let mut snippet = String::new();
        if start > 0 {
            snippet.push_str("...");
        }
        snippet.push_str(&content[start..end]);
        if end < content.len() {
            snippet.push_str("...");
        }
        return snippet;
    }

    // No term occurs: lead with the opening of the document.
    let end = ceil_char_boundary(content, SNIPPET_WINDOW);
    format!("{}...", &content[..end])
}

fn floor_char_boundary(s: &str, mut i: usize) -> usize {
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_char_boundary(s: &str, mut i: usize) -> usize {
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_short_content_verbatim() {
        let content = "short document body";
        assert_eq!(generate_snippet(content, &terms(&["short"])), content);
    }

    #[test]
    fn test_window_around_first_hit() {
        let content = format!("{}needle{}", "a".repeat(300), "b".repeat(300));
        let snippet = generate_snippet(&content, &terms(&["needle"]));
        assert!(snippet.starts_with("..."));
        assert!(snippet.ends_with("..."));
        assert!(snippet.contains("needle"));
        // 200-char window plus both affixes
        assert_eq!(snippet.len(), SNIPPET_WINDOW + 6);
    }

    #[test]
    fn test_hit_near_start_keeps_prefix() {
        let content = format!("needle{}", "x".repeat(400));
        let snippet = generate_snippet(&content, &terms(&["needle"]));
        assert!(snippet.starts_with("needle"));
        assert!(snippet.ends_with("..."));
    }

    #[test]
    fn test_case_insensitive_scan() {
        let content = format!("{}NEEDLE{}", "y".repeat(150), "z".repeat(150));
        let snippet = generate_snippet(&content, &terms(&["needle"]));
        assert!(snippet.contains("NEEDLE"));
    }

    #[test]
    fn test_first_term_in_order_wins() {
        let content = format!("{}alpha{}beta{}", "q".repeat(250), "r".repeat(250), "s".repeat(250));
        let snippet = generate_snippet(&content, &terms(&["beta", "alpha"]));
        assert!(snippet.contains("beta"));
        assert!(!snippet.contains("alpha"));
    }

    #[test]
    fn test_no_hit_falls_back_to_opening() {
        let content = "w".repeat(500);
        let snippet = generate_snippet(&content, &terms(&["absent"]));
        assert_eq!(snippet, format!("{}...", "w".repeat(200)));
    }

    #[test]
    fn test_multibyte_content_stays_on_boundaries() {
        let content = format!("{}needle{}", "é".repeat(120), "ü".repeat(120));
        let snippet = generate_snippet(&content, &terms(&["needle"]));
        assert!(snippet.contains("needle"));
    }
}
