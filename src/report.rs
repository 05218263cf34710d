// src/report.rs
// =============================================================================
// This module turns a RunSummary into text for the terminal.
//
// Two formats:
// - the plain report: a block of counters, then every document with
//   problems followed by one `[symbol] url` line per problem
// - JSON (--json): the whole summary, for scripts and CI tooling
//
// Both are read-only views of the summary.
// =============================================================================

use crate::summary::RunSummary;
use anyhow::Result;
use std::path::Path;

pub fn print_summary(summary: &RunSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        print!("{}", render_text(summary));
    }
    Ok(())
}

pub fn render_text(summary: &RunSummary) -> String {
    let counters = [
        ("Total files checked", summary.files_checked),
        ("Total links checked", summary.total),
        ("Local links", summary.local),
        ("Remote links", summary.remote),
        ("Empty links", summary.empty),
        ("Broken links", summary.broken),
        ("Skipped links", summary.skipped),
    ];
    let mut out: String = counters
        .iter()
        .map(|(label, count)| format!("{label:>19}: {count}\n"))
        .collect();

    for (document, problems) in &summary.problems {
        out.push_str(&format!("\n{}:\n", display_path(document)));
        for problem in problems {
            out.push_str(&format!("[{}] {}\n", problem.status.symbol(), problem.url));
        }
    }

    out
}

// Documents under the working directory are shown relative to it
fn display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}
