// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - markdown / html: Pull raw link targets out of document text
// - links: Wrap them into LinkRecords tagged with their document
// - classify: Excluded, empty, fragment, remote or local?
// - local: Resolve local links against the filesystem
// - http: Link status types and the concurrent remote checker
// - sequential / retry: The blocking remote checker and its fallback GET
//
// This file (mod.rs) is the module root; it re-exports the public API the
// rest of the application uses.
// =============================================================================

mod classify;
mod html;
mod http;
mod links;
mod local;
mod markdown;
mod retry;
mod sequential;

#[cfg(test)]
pub(crate) mod test_server;

pub use classify::{Classifier, LinkClass};
pub use http::{DeadReason, LinkStatus, RequestMethod, VerifyStrategy};
pub use links::extract_links;
pub use local::resolve_local;
