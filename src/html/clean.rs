use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Reduce an HTML document to normalized plain text.
///
/// Removal order: comments, then script/style blocks, then every remaining
/// tag, then a minimal entity set, then whitespace collapse and trim.
pub fn extract_text(html: &str) -> String {
    let mut text = html.to_string();

    remove_comments(&mut text);
    remove_tag_blocks(&mut text, "<script", "</script>");
    remove_tag_blocks(&mut text, "<style", "</style>");

    let mut text = TAG_RE.replace_all(&text, " ").into_owned();

    for (entity, replacement) in [
        ("&nbsp;", " "),
        ("&amp;", "&"),
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&quot;", "\""),
    ] {
        text = text.replace(entity, replacement);
    }

    collapse_whitespace(&text)
}

/// Content between the first `<title>` and the following `</title>`,
/// whitespace-collapsed. Empty when either marker is missing.
pub fn get_title(html: &str) -> String {
    let Some(start) = html.find("<title>") else {
        return String::new();
    };
    let start = start + "<title>".len();
    let Some(end) = html[start..].find("</title>") else {
        return String::new();
    };
    collapse_whitespace(&html[start..start + end])
}

fn collapse_whitespace(text: &str) -> String {
    WS_RE.replace_all(text, " ").trim().to_string()
}

/// Strip `<!-- ... -->` comments iteratively. An opener with no closer
/// terminates the pass with the remainder left in place.
fn remove_comments(html: &mut String) {
    let mut pos = 0;
    while let Some(start) = html[pos..].find("<!--").map(|i| i + pos) {
        match html[start..].find("-->") {
            Some(close) => {
                html.replace_range(start..start + close + "-->".len(), "");
                pos = start;
            }
            None => break,
        }
    }
}

/// Strip `open ... close` blocks (script/style), matching tag names
/// case-insensitively and erasing greedily to the first close marker.
fn remove_tag_blocks(html: &mut String, open: &str, close: &str) {
    let mut pos = 0;
    while let Some(start) = find_ignore_case(html, open, pos) {
        match find_ignore_case(html, close, start) {
            Some(end) => {
                html.replace_range(start..end + close.len(), "");
                pos = start;
            }
            None => break,
        }
    }
}

fn find_ignore_case(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let haystack = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() || from + needle.len() > haystack.len() {
        return None;
    }
    (from..=haystack.len() - needle.len())
        .find(|&i| haystack[i..i + needle.len()].eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_strips_tags() {
        let html = "<html><body><p>Hello <b>world</b></p></body></html>";
        assert_eq!(extract_text(html), "Hello world");
    }

    #[test]
    fn test_extract_text_removes_comments() {
        let html = "before<!-- hidden <p>markup</p> -->after";
        assert_eq!(extract_text(html), "before after");
    }

    #[test]
    fn test_unmatched_comment_opener_terminates_pass() {
        let html = "visible <!-- never closed";
        // The tag-strip pass does not touch the dangling opener text.
        assert_eq!(extract_text(html), "visible <!-- never closed");
    }

    #[test]
    fn test_extract_text_removes_scripts_and_styles() {
        let html = "<p>keep</p><SCRIPT type='x'>var a = '<p>no</p>';</SCRIPT>\
                    <Style>body { color: red }</Style><p>this</p>";
        assert_eq!(extract_text(html), "keep this");
    }

    #[test]
    fn test_extract_text_decodes_minimal_entities() {
        let html = "a&nbsp;b &amp; c &lt;d&gt; &quot;e&quot;";
        assert_eq!(extract_text(html), "a b & c <d> \"e\"");
    }

    #[test]
    fn test_extract_text_collapses_whitespace() {
        let html = "  one \n\n two\t\tthree  ";
        assert_eq!(extract_text(html), "one two three");
    }

    #[test]
    fn test_extract_text_idempotent_after_one_pass() {
        let html = "<html><!-- c --><head><title>T</title><style>p{}</style></head>\
                    <body>alpha &amp; <i>beta</i>\n gamma</body></html>";
        let once = extract_text(html);
        assert_eq!(extract_text(&once), once);
    }

    #[test]
    fn test_get_title() {
        assert_eq!(get_title("<title>My Page</title>"), "My Page");
        assert_eq!(get_title("<title>  spaced \n out </title>"), "spaced out");
        assert_eq!(get_title("<title>no close"), "");
        assert_eq!(get_title("no title at all"), "");
    }
}
