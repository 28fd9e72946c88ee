use std::sync::LazyLock;

use regex::Regex;

static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<a\s+[^>]*href="([^"]*)"[^>]*>"#).unwrap());

/// Pull every `href` out of `<a>` tags and resolve it against `base_url`.
/// Empty values and fragment-only links are skipped.
pub fn extract_links(html: &str, base_url: &str) -> Vec<String> {
    let mut links = Vec::new();
    for caps in HREF_RE.captures_iter(html) {
        let href = &caps[1];
        if href.is_empty() || href.starts_with('#') {
            continue;
        }
        links.push(resolve_link(href, base_url));
    }
    links
}

/// Relative-to-absolute resolution:
/// scheme-prefixed values pass through, `/`-rooted values join the
/// scheme+authority of the base, anything else joins the base truncated
/// to its last `/`.
fn resolve_link(href: &str, base_url: &str) -> String {
    if href.starts_with("http") {
        return href.to_string();
    }

    if href.starts_with('/') {
        if let Some(scheme_end) = base_url.find("://") {
            let authority_start = scheme_end + "://".len();
            return match base_url[authority_start..].find('/') {
                Some(path) => format!("{}{}", &base_url[..authority_start + path], href),
                None => format!("{}{}", base_url, href),
            };
        }
        return href.to_string();
    }

    match base_url.rfind('/') {
        Some(last) => format!("{}{}", &base_url[..=last], href),
        None => href.to_string(),
    }
}
