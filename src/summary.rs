// src/summary.rs
// =============================================================================
// The run summary: counters plus the list of problems per document.
//
// A RunSummary starts empty, is updated by `record` as outcomes come in,
// and is read once at the end for the report and the exit code. It is a
// plain value owned by the run; the concurrent checker hands its results
// back before any of them are recorded, so no locking is ever needed.
//
// Counting rules:
// - local and remote links count towards `total`; excluded links do not
// - every outcome bumps exactly one of alive / empty / broken / skipped
// - every outcome that is not alive adds one problem entry
// =============================================================================

use crate::checker::LinkStatus;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Exit code when broken links were found, following curl's
/// "HTTP page not retrieved" code.
pub const EXIT_BROKEN_LINKS: i32 = 22;

/// Which counter family an outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Local,
    Remote,
    Excluded,
}

/// The verdict for one link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub source_document: PathBuf,
    pub url: String,
    pub status: LinkStatus,
}

impl Outcome {
    pub fn new(source_document: &Path, url: impl Into<String>, status: LinkStatus) -> Self {
        Self {
            source_document: source_document.to_path_buf(),
            url: url.into(),
            status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    pub url: String,
    pub status: LinkStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub files_checked: usize,
    pub total: usize,
    pub local: usize,
    pub remote: usize,
    pub alive: usize,
    pub empty: usize,
    pub broken: usize,
    pub skipped: usize,
    /// Problems grouped by document, in the order they were recorded
    pub problems: BTreeMap<PathBuf, Vec<Problem>>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_document(&mut self) {
        self.files_checked += 1;
    }

    pub fn record(&mut self, kind: LinkKind, outcome: Outcome) {
        match kind {
            LinkKind::Local => {
                self.local += 1;
                self.total += 1;
            }
            LinkKind::Remote => {
                self.remote += 1;
                self.total += 1;
            }
            LinkKind::Excluded => {}
        }

        match &outcome.status {
            LinkStatus::Alive => {
                self.alive += 1;
                return;
            }
            LinkStatus::Empty => self.empty += 1,
            LinkStatus::Ignored => self.skipped += 1,
            LinkStatus::Dead(_) | LinkStatus::Error(_) => self.broken += 1,
        }

        self.problems
            .entry(outcome.source_document)
            .or_default()
            .push(Problem {
                url: outcome.url,
                status: outcome.status,
            });
    }

    /// Records `count` alive links at once. Alive links leave no problem
    /// entry, so only the counters move.
    pub fn record_alive(&mut self, kind: LinkKind, count: usize) {
        match kind {
            LinkKind::Local => self.local += count,
            LinkKind::Remote => self.remote += count,
            LinkKind::Excluded => return,
        }
        self.total += count;
        self.alive += count;
    }

    /// A run fails when at least one link is broken.
    pub fn is_failure(&self) -> bool {
        self.broken > 0
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_failure() {
            EXIT_BROKEN_LINKS
        } else {
            0
        }
    }
}
