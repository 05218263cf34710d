// src/docs/mod.rs
// =============================================================================
// This module finds the documents we scan for links.
//
// Currently implements:
// - Walking a root path (a single file, or a directory, optionally recursive)
// - Keeping only files with the configured extension (e.g. ".md")
// - Skipping documents matched by an ignore file (one regex per line)
//
// The rest of the program only ever sees the resulting list of paths.
// =============================================================================

mod ignore;
mod walk;

pub use ignore::IgnoreRules;
pub use walk::collect_documents;
