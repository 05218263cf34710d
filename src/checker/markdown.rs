// src/checker/markdown.rs
// =============================================================================
// This module extracts link targets from Markdown text.
//
// We match the `](target)` half of `[label](target)` with a regular
// expression instead of running a full CommonMark parser. A parser would
// silently drop things we need to see, like empty targets `[x]()`, and we
// want every raw occurrence so that nothing escapes the checker.
//
// No validation happens here: a target may be empty, relative, absolute,
// a fragment, or garbage. Deciding what it is belongs to the classifier.
// =============================================================================

use regex::Regex;
use std::sync::OnceLock;

/// `[Link label](link target)`; captures the target.
pub const MARKDOWN_LINK_PATTERN: &str = r"\]\(([^)]*)\)";

fn markdown_link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(MARKDOWN_LINK_PATTERN).expect("markdown link pattern is valid"))
}

// Extracts all Markdown link targets, in document order
//
// Example input:
//   "See [install](install.md) and [Rust](https://www.rust-lang.org)."
//
// Example output:
//   vec!["install.md", "https://www.rust-lang.org"]
pub fn extract_markdown_links(markdown: &str) -> Vec<String> {
    markdown_link_regex()
        .captures_iter(markdown)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
