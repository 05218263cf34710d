// src/docs/ignore.rs
// =============================================================================
// Ignore rules for documents.
//
// An ignore file holds one regular expression per line. A document is
// skipped when any rule matches anywhere in its full path, ignoring case.
// Blank lines and lines starting with '#' are not rules (an empty regex
// would match every path).
// =============================================================================

use crate::config::ConfigError;
use regex::{Regex, RegexBuilder};
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    rules: Vec<Regex>,
}

impl IgnoreRules {
    /// Compiles the given patterns case-insensitively.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        let rules = patterns
            .iter()
            .map(|line| line.as_ref().trim_end())
            .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| ConfigError::InvalidIgnorePattern {
                        pattern: pattern.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::IgnoreFile {
            path: path.to_path_buf(),
            source,
        })?;
        let lines: Vec<&str> = text.lines().collect();
        Self::new(lines.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        let full = path.to_string_lossy();
        self.rules.iter().any(|rule| rule.is_match(&full))
    }
}
