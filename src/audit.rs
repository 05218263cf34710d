// src/audit.rs
// =============================================================================
// This module runs one link audit from start to finish.
//
// What happens here:
// 1. Read each document and extract its links
// 2. Classify every link; excluded, empty and local links are settled
//    right away, remote links are set aside
// 3. Hand all remote links to the configured strategy in one batch
// 4. Fold every outcome into a RunSummary and return it
//
// The summary is created here and returned to the caller. It is only ever
// modified on this task: the remote checker returns its failures as
// values instead of writing into shared state.
// =============================================================================

use crate::checker::{extract_links, resolve_local, LinkClass, LinkStatus};
use crate::config::RunConfig;
use crate::summary::{LinkKind, Outcome, RunSummary};
use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

// Checks every link in the given documents
//
// Parameters:
//   documents: the documents to scan, already filtered and ordered
//   config: the validated run configuration
//
// Returns: the filled-in summary. Per-link failures are recorded in the
// summary; only setup errors (e.g. no HTTP client) come back as Err.
pub async fn check_links(documents: &[PathBuf], config: &RunConfig) -> Result<RunSummary> {
    let mut summary = RunSummary::new();
    let mut remote = Vec::new();

    for document in documents {
        let text = match fs::read(document) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!("Skipping unreadable document {}: {e}", document.display());
                continue;
            }
        };
        summary.record_document();

        for link in extract_links(&text, document, &config.root) {
            match config.classifier.classify(&link.url) {
                LinkClass::Excluded => summary.record(
                    LinkKind::Excluded,
                    Outcome::new(&link.source_document, link.url, LinkStatus::Ignored),
                ),
                // Same-document anchors are assumed to be fine
                LinkClass::Fragment => {}
                LinkClass::Empty => summary.record(
                    LinkKind::Local,
                    Outcome::new(&link.source_document, link.url, LinkStatus::Empty),
                ),
                LinkClass::Local => {
                    let status = resolve_local(&link.url, &link.source_document, &config.ext);
                    summary.record(
                        LinkKind::Local,
                        Outcome::new(&link.source_document, link.url, status),
                    );
                }
                LinkClass::Remote if config.local_only => {}
                LinkClass::Remote => remote.push(link),
            }
        }
    }

    if !remote.is_empty() {
        let dispatched = remote.len();
        info!("Checking {dispatched} remote link(s) with {:?}", config.strategy);

        let failures = config
            .strategy
            .verify(remote, config.method, &config.headers)
            .await?;

        summary.record_alive(LinkKind::Remote, dispatched - failures.len());
        for failure in failures {
            if let Some(reason) = failure.status.reason() {
                info!("{} in {}: {reason}", failure.link.url, failure.link.source_document.display());
            }
            summary.record(
                LinkKind::Remote,
                Outcome::new(&failure.link.source_document, failure.link.url, failure.status),
            );
        }
    }

    Ok(summary)
}
