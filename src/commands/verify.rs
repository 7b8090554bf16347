use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;
use validator::Validate;

use crate::core::{DuplicateReport, DuplicateVerifier};
use crate::models::VerifyRequest;

/// Human-readable report, one block per duplicated pair
pub fn format_report(report: &DuplicateReport, verbose: bool) -> String {
    if report.is_clean() {
        return "✅ No duplicate matches found across markdown files.\n".to_string();
    }

    let mut out = String::from("❌ Duplicate matches detected!\n\n");
    for dup in &report.duplicates {
        let _ = writeln!(out, "Pair: {}  (seen {} times)", dup.pair, dup.occurrences.len());
        if verbose {
            for occ in &dup.occurrences {
                let _ = writeln!(
                    out,
                    "  - {}: line {}: {}",
                    occ.filename, occ.line_number, occ.line_text
                );
            }
        }
        out.push('\n');
    }
    out
}

/// Handler for `pair-rounds verify`; returns true when no duplicates were found
pub fn execute(request: &VerifyRequest, json: bool) -> Result<bool> {
    request.validate().context("Invalid verify parameters")?;

    let root = Path::new(&request.root);
    let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());

    let report = DuplicateVerifier::new(request.extension.as_str())
        .verify(&root)
        .with_context(|| format!("Failed to verify {}", root.display()))?;

    let stats = report.stats;
    tracing::info!(
        "Verified {} files ({} lines parsed, {} skipped)",
        stats.files_scanned,
        stats.lines_parsed,
        stats.lines_skipped
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_report(&report, !request.quiet));
    }

    Ok(report.is_clean())
}
