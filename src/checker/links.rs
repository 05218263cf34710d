// src/checker/links.rs
// =============================================================================
// This module turns a document's text into link records.
//
// Both extractors run over the same text; anchor matches come first,
// followed by Markdown matches. Each raw match becomes one LinkRecord that
// remembers which document it came from.
// =============================================================================

use super::html::extract_html_links;
use super::markdown::extract_markdown_links;
use std::path::{Path, PathBuf};

/// One raw link occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    /// The link target exactly as written
    pub url: String,
    /// The document the link was found in
    pub source_document: PathBuf,
    /// The root path the run was started with
    pub base_path: PathBuf,
}

/// Extracts every link occurrence from a document's text.
pub fn extract_links(text: &str, source_document: &Path, base_path: &Path) -> Vec<LinkRecord> {
    extract_html_links(text)
        .into_iter()
        .chain(extract_markdown_links(text))
        .map(|url| LinkRecord {
            url,
            source_document: source_document.to_path_buf(),
            base_path: base_path.to_path_buf(),
        })
        .collect()
}
