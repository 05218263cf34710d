// src/checker/html.rs
// =============================================================================
// This module extracts links from HTML anchors embedded in documents.
//
// Markdown files frequently contain raw HTML such as
//   <a href="https://example.com" target="_blank">Example</a>
// so we scan for `<a ... href="...">` with either quote style.
//
// Rust's regex crate has no backreferences, so the "same closing quote"
// rule is written as two alternatives, one per quote character. Neither
// alternative crosses a line break.
// =============================================================================

use regex::Regex;
use std::sync::OnceLock;

/// `<a href="target">` or `<a class="x" href='target'>`; the target is in
/// capture 1 (double quotes) or capture 2 (single quotes).
pub const HTML_LINK_PATTERN: &str = r#"<a\s+(?:[^>]*?\s+)?href=(?:"([^"\n]*)"|'([^'\n]*)')"#;

fn html_link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(HTML_LINK_PATTERN).expect("html link pattern is valid"))
}

// Extracts all anchor href values, in document order
//
// Unlike a browser we do not resolve relative hrefs against anything here;
// the raw attribute text is returned as written.
pub fn extract_html_links(html: &str) -> Vec<String> {
    html_link_regex()
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}
