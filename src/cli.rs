// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// The tool has a single job (checking links in a documentation tree), so
// instead of subcommands we use one flat struct: a positional path, an
// optional positional domain, and a handful of flags.
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Derive macros: Automatically generate parsing code for our types
// - Option<T>: For arguments the user may leave out
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
#[derive(Parser, Debug)]
#[command(
    name = "docs-linkcheck",
    version = "0.1.0",
    about = "Check links in markdown files common to mkdocs-generated websites",
    long_about = "docs-linkcheck scans a documentation tree for dead local file references \
                  and dead remote URLs. It exits with code 22 when broken links are found, \
                  which makes it easy to use in CI/CD pipelines."
)]
pub struct Cli {
    /// Path to the markdown files (a single file or a directory)
    pub path: PathBuf,

    /// Check only links to this domain (say github.com, without https etc.)
    ///
    /// Links to other hosts are treated as local references.
    pub domain: Option<String>,

    /// File extension to scan
    #[arg(long, default_value = ".md")]
    pub ext: String,

    /// The HTTP method to use when checking external links (get or head)
    ///
    /// HEAD is faster but gives false positives. GET is reliable but slower.
    /// When omitted, the concurrent checker uses GET and the sequential one HEAD.
    #[arg(short, long)]
    pub method: Option<String>,

    /// Don't run remote checks concurrently; check one link at a time
    #[arg(long)]
    pub sync: bool,

    /// A regular expression for links to exclude (may be repeated)
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Only check local files
    #[arg(short, long)]
    pub local: bool,

    /// Recurse directories under path
    #[arg(short, long)]
    pub recurse: bool,

    /// Extra request header, as "Name: value" (may be repeated)
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// File with one ignore pattern per line for documents to skip
    ///
    /// Defaults to <path>/.linkcheckignore when that file exists.
    #[arg(long)]
    pub ignore_file: Option<PathBuf>,

    /// Output the run summary in JSON format instead of a text report
    #[arg(long)]
    pub json: bool,

    /// Log every checked link
    #[arg(short, long)]
    pub verbose: bool,
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Positional vs flag arguments
//    - Fields without #[arg(...)] are positional: `docs-linkcheck docs github.com`
//    - #[arg(long)] turns a field into a `--flag`
//    - #[arg(short)] adds the one-letter form, derived from the field name
//
// 2. Why is `method` a String and not an enum?
//    - The method is validated when the run configuration is built
//    - That keeps "unknown method" a configuration error we report ourselves
//
// 3. Vec<String> arguments
//    - clap collects every occurrence of a repeated flag into the Vec
//    - `--exclude a --exclude b` gives vec!["a", "b"]
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["docs-linkcheck", "docs"]);
        assert_eq!(cli.path, PathBuf::from("docs"));
        assert_eq!(cli.ext, ".md");
        assert!(cli.domain.is_none());
        assert!(cli.method.is_none());
        assert!(!cli.sync);
        assert!(!cli.recurse);
    }

    #[test]
    fn test_domain_and_repeated_flags() {
        let cli = Cli::parse_from([
            "docs-linkcheck",
            "docs",
            "github.com",
            "-r",
            "--exclude",
            "internal",
            "--exclude",
            "staging",
            "-H",
            "Accept: text/html",
            "-m",
            "head",
        ]);
        assert_eq!(cli.domain.as_deref(), Some("github.com"));
        assert!(cli.recurse);
        assert_eq!(cli.exclude, vec!["internal", "staging"]);
        assert_eq!(cli.headers, vec!["Accept: text/html"]);
        assert_eq!(cli.method.as_deref(), Some("head"));
    }
}
