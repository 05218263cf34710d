// src/docs/walk.rs
// =============================================================================
// This module enumerates the documents under a root path.
//
// How it works:
// 1. A root that is a file is returned as-is (whatever its extension)
// 2. A root that is a directory is listed in sorted order
// 3. Files ending with the extension are kept unless an ignore rule matches
// 4. Sub-directories are only descended into when `recurse` is set
//
// Sorting makes the report deterministic: two runs over the same tree
// list documents in the same order.
//
// Rust concepts:
// - Recursion over the filesystem with std::fs::read_dir
// - anyhow::Context: Attach the offending path to I/O errors
// =============================================================================

use super::IgnoreRules;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

// Collects the documents to scan
//
// Parameters:
//   root: a file or directory (made absolute here)
//   ext: the extension filter, including the dot (".md")
//   recurse: whether to descend into sub-directories
//   ignore: document ignore rules
//
// Returns: absolute document paths, directory by directory in sorted order
pub fn collect_documents(
    root: &Path,
    ext: &str,
    recurse: bool,
    ignore: &IgnoreRules,
) -> Result<Vec<PathBuf>> {
    let root = fs::canonicalize(root)
        .with_context(|| format!("could not resolve path {}", root.display()))?;

    if root.is_file() {
        debug!("Adding file to be checked: {}", root.display());
        return Ok(vec![root]);
    }

    let mut documents = Vec::new();
    walk_dir(&root, ext, recurse, ignore, &mut documents)?;
    Ok(documents)
}

fn walk_dir(
    dir: &Path,
    ext: &str,
    recurse: bool,
    ignore: &IgnoreRules,
    documents: &mut Vec<PathBuf>,
) -> Result<()> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("could not list directory {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("could not list directory {}", dir.display()))?;
    entries.sort();

    for path in entries {
        if path.is_file() {
            if !has_extension(&path, ext) {
                continue;
            }
            if ignore.is_ignored(&path) {
                debug!("Ignoring {}", path.display());
                continue;
            }
            documents.push(path);
        } else if path.is_dir() && recurse {
            walk_dir(&path, ext, recurse, ignore, documents)?;
        }
    }

    Ok(())
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().ends_with(ext))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("guide/drafts")).unwrap();
        fs::write(root.join("index.md"), "# Home").unwrap();
        fs::write(root.join("about.md"), "# About").unwrap();
        fs::write(root.join("logo.png"), "png").unwrap();
        fs::write(root.join("guide/install.md"), "# Install").unwrap();
        fs::write(root.join("guide/drafts/wip.md"), "# WIP").unwrap();
        dir
    }

    fn names(root: &Path, docs: &[PathBuf]) -> Vec<String> {
        let root = fs::canonicalize(root).unwrap();
        docs.iter()
            .map(|p| p.strip_prefix(&root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_flat_listing_is_sorted_and_filtered() {
        let dir = tree();
        let docs = collect_documents(dir.path(), ".md", false, &IgnoreRules::default()).unwrap();
        assert_eq!(names(dir.path(), &docs), vec!["about.md", "index.md"]);
    }

    #[test]
    fn test_recursive_listing() {
        let dir = tree();
        let docs = collect_documents(dir.path(), ".md", true, &IgnoreRules::default()).unwrap();
        assert_eq!(
            names(dir.path(), &docs),
            vec!["about.md", "guide/drafts/wip.md", "guide/install.md", "index.md"]
        );
    }

    #[test]
    fn test_ignore_rules_skip_documents() {
        let dir = tree();
        let ignore = IgnoreRules::new(&["DRAFTS"]).unwrap();
        let docs = collect_documents(dir.path(), ".md", true, &ignore).unwrap();
        assert_eq!(
            names(dir.path(), &docs),
            vec!["about.md", "guide/install.md", "index.md"]
        );
    }

    #[test]
    fn test_single_file_root() {
        let dir = tree();
        let file = dir.path().join("logo.png");
        let docs = collect_documents(&file, ".md", false, &IgnoreRules::default()).unwrap();
        assert_eq!(docs, vec![fs::canonicalize(&file).unwrap()]);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(collect_documents(&missing, ".md", false, &IgnoreRules::default()).is_err());
    }
}
