// src/checker/local.rs
// =============================================================================
// This module checks local (filesystem) links.
//
// Documentation generators let you link to a page in several ways:
//   [a](install.md)        the file itself
//   [a](install)           the page, extension left off
//   [a](guide/)            a directory that serves guide/index.md
//
// So a local link is alive when any of these exists as a regular file:
//   <target>, <target><ext>, <target>/index<ext>
//
// Image links (.png, .jpeg, .jpg, .gif, .svg) are the exception: they must
// point straight at an existing file. There is no index fallback for them.
// =============================================================================

use super::classify::strip_fragment;
use super::http::{DeadReason, LinkStatus};
use regex::{Regex, RegexBuilder};
use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

fn image_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        RegexBuilder::new(r"\.(png|jpeg|jpg|gif|svg)$")
            .case_insensitive(true)
            .build()
            .expect("image pattern is valid")
    })
}

// Resolves a local link and reports whether it exists
//
// Parameters:
//   link: the link as written (a #fragment is dropped)
//   source_document: the document containing the link
//   ext: the documentation extension, e.g. ".md"
//
// Returns: LinkStatus::Alive or LinkStatus::Dead(DeadReason::NotFound)
pub fn resolve_local(link: &str, source_document: &Path, ext: &str) -> LinkStatus {
    let target = resolve_target(link, source_document);

    let alive = if is_image(&target) {
        target.is_file()
    } else {
        candidates(&target, ext).iter().any(|path| path.is_file())
    };

    if alive {
        LinkStatus::Alive
    } else {
        LinkStatus::Dead(DeadReason::NotFound)
    }
}

/// The absolute, normalized path a local link points at.
///
/// Leading and trailing slashes are stripped, so `/guide/` means `guide`
/// next to the source document.
pub fn resolve_target(link: &str, source_document: &Path) -> PathBuf {
    let stem = strip_fragment(link).trim_matches('/');
    normalize(&document_dir(source_document).join(stem))
}

// The directory links in a document are relative to. For `docs/index.md`
// and `docs/page.md` alike this is `docs/`.
fn document_dir(source_document: &Path) -> PathBuf {
    source_document
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

fn is_image(path: &Path) -> bool {
    image_regex().is_match(&path.to_string_lossy())
}

fn candidates(target: &Path, ext: &str) -> [PathBuf; 3] {
    let mut with_ext = OsString::from(target.as_os_str());
    with_ext.push(ext);

    [
        target.to_path_buf(),
        PathBuf::from(with_ext),
        target.join(format!("index{ext}")),
    ]
}

// Resolves `.`, `..` and symlinks one component at a time. Every prefix
// that exists is replaced by its canonical path, so `link/..` leaves the
// directory a symlink points at, not the one it lives in. Components past
// the first missing one are resolved lexically.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)))
                    && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => {
                out.push(other.as_os_str());
                if let Ok(real) = fs::canonicalize(&out) {
                    out = real;
                }
            }
        }
    }
    out
}
