// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Validate them into a RunConfig (bad patterns, methods, paths abort here)
// 3. Find the documents, check their links, print the report
// 4. Exit with a proper code (0 = all good, 22 = broken links, 2 = error)
//
// Exit code 22 is what curl uses for "HTTP page not retrieved"; CI scripts
// that already understand curl's codes understand ours.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod audit; // src/audit.rs - runs one link audit
mod checker; // src/checker/ - link extraction and checking
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - validated run configuration
mod docs; // src/docs/ - finding the documents to scan
mod report; // src/report.rs - printing the summary
mod summary; // src/summary.rs - counters and problems

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use config::RunConfig;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Exit code for configuration and other unexpected errors.
const EXIT_ERROR: i32 = 2;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG wins when set; otherwise warnings only, or info with --verbose
fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    let config = RunConfig::from_cli(&cli)?;
    let started = Instant::now();

    if let Some(domain) = config.classifier.domain() {
        tracing::info!("Only links to {domain} are checked remotely");
    }
    if !config.ignore.is_empty() {
        tracing::info!("Document ignore rules are active");
    }

    let documents =
        docs::collect_documents(&config.root, &config.ext, config.recurse, &config.ignore)?;
    tracing::info!("Found {} document(s) to scan", documents.len());

    let summary = audit::check_links(&documents, &config).await?;

    report::print_summary(&summary, cli.json)?;
    if !cli.json {
        println!("{:.3} seconds to check links", started.elapsed().as_secs_f64());
    }

    if summary.is_failure() {
        if !cli.json {
            println!("Bad links were found. Exiting with an error.");
        }
        return Ok(summary.exit_code());
    }

    Ok(0)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does main() not return Result?
//    - We want full control over the exit code
//    - Returning Err from main always exits with 1; we need 2 and 22
//
// 2. What is {e:#} in the error message?
//    - The alternate format of anyhow::Error prints the whole chain:
//      "could not resolve path docs: No such file or directory"
//
// 3. Why log to stderr?
//    - stdout carries the report (or JSON); logs must not get mixed in
// -----------------------------------------------------------------------------
