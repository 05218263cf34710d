// src/checker/classify.rs
// =============================================================================
// This module decides what kind of link we are looking at.
//
// Order of checks (first match wins):
// 1. Excluded - any exclude pattern matches the raw link text
// 2. Empty    - "" or a bare "#"
// 3. Fragment - "#section", a same-document anchor (always valid, skipped)
// 4. Remote   - an http(s) URL; with a domain filter, only that exact host
// 5. Local    - everything else, resolved against the filesystem
//
// Classification is a pure function of the link text and the classifier's
// configuration. Nothing here touches the filesystem or the network.
// =============================================================================

use crate::config::ConfigError;
use regex::Regex;
use std::sync::OnceLock;

/// What the checker should do with a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkClass {
    /// Matched an exclude pattern; reported as ignored, never checked
    Excluded,
    /// No target at all
    Empty,
    /// Same-document anchor; assumed valid and not counted
    Fragment,
    /// Checked over the network
    Remote,
    /// Checked against the filesystem
    Local,
}

// Any absolute http(s) URL with a non-empty authority
const REMOTE_PATTERN: &str = r"^https?://[^\s/?#]+";

fn remote_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(REMOTE_PATTERN).expect("remote url pattern is valid"))
}

#[derive(Debug, Clone)]
pub struct Classifier {
    domain: Option<String>,
    domain_regex: Option<Regex>,
    exclude: Vec<Regex>,
}

impl Classifier {
    /// Compiles the exclude patterns. A pattern that does not compile is a
    /// configuration error.
    pub fn new<S: AsRef<str>>(domain: Option<String>, exclude: &[S]) -> Result<Self, ConfigError> {
        let exclude = exclude
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(pattern).map_err(|source| ConfigError::InvalidExcludePattern {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // The host must be exactly the domain: it has to be followed by a
        // port, path, query, fragment or the end of the link.
        let domain_regex = domain
            .as_deref()
            .map(|d| format!(r"^https?://{}(?:[:/?#]|$)", regex::escape(d)))
            .map(|pattern| Regex::new(&pattern).expect("escaped domain pattern is valid"));

        Ok(Self {
            domain,
            domain_regex,
            exclude,
        })
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn classify(&self, url: &str) -> LinkClass {
        if self.is_excluded(url) {
            LinkClass::Excluded
        } else if is_empty(url) {
            LinkClass::Empty
        } else if url.starts_with('#') {
            LinkClass::Fragment
        } else if self.is_remote(url) {
            LinkClass::Remote
        } else {
            LinkClass::Local
        }
    }

    pub fn is_excluded(&self, url: &str) -> bool {
        self.exclude.iter().any(|re| re.is_match(url))
    }

    pub fn is_remote(&self, url: &str) -> bool {
        match &self.domain_regex {
            Some(re) => re.is_match(url),
            None => remote_regex().is_match(url),
        }
    }
}

pub fn is_empty(url: &str) -> bool {
    url.is_empty() || url == "#"
}

/// Drops a `#fragment` from a local link; the filesystem knows nothing
/// about anchors.
pub fn strip_fragment(url: &str) -> &str {
    match url.find('#') {
        Some(idx) => &url[..idx],
        None => url,
    }
}
