//! Output rendering for check and coverage results

use super::{CheckOutcome, RuleCoverage};
use crate::coverage::{average_score, CoverageReport};
use crate::drift::{DriftStatus, DriftVerdict};
use anyhow::Result;
use serde::Serialize;
use std::fmt::Write;

/// Maximum number of missing entity names listed per file
const MAX_MISSING_LISTED: usize = 5;

fn status_label(status: DriftStatus) -> &'static str {
    match status {
        DriftStatus::Fresh => "✅ FRESH",
        DriftStatus::StaleTimestamp => "⚠️  STALE",
        DriftStatus::StaleSemantic => "❌ DRIFT",
        DriftStatus::Unknown => "❓ UNKNOWN",
    }
}

/// Render drift verdicts as text
pub fn render_verdicts(verdicts: &[DriftVerdict]) -> String {
    let mut out = String::new();

    if verdicts.is_empty() {
        out.push_str("No rules configured.\n");
        return out;
    }

    for verdict in verdicts {
        let _ = writeln!(out, "{} {}", status_label(verdict.status), verdict.doc_path.display());

        for source_file in &verdict.source_files {
            let drifting = verdict
                .drifting_sources
                .iter()
                .find(|d| &d.source_file == source_file);

            match drifting {
                Some(source) => {
                    let _ = writeln!(
                        out,
                        "   Source: {} ({})",
                        source_file.display(),
                        source.status
                    );
                    let _ = writeln!(out, "   Details: {}", source.reason);
                }
                None => {
                    let _ = writeln!(out, "   Source: {}", source_file.display());
                }
            }
        }

        if verdict.status == DriftStatus::Unknown {
            let _ = writeln!(out, "   Details: No meaningful history for this doc");
        }
    }

    let stale = verdicts.iter().filter(|v| v.status.is_stale()).count();
    out.push('\n');
    if stale > 0 {
        let _ = writeln!(out, "[!] Found {} drifting file(s).", stale);
    } else {
        out.push_str("✨ All documentation is up to date!\n");
    }

    out
}

fn render_report(out: &mut String, report: &CoverageReport) {
    let _ = writeln!(
        out,
        "  {}: {:.0}% ({}/{})",
        report.file.display(),
        report.score * 100.0,
        report.present.len(),
        report.total()
    );

    if report.missing.is_empty() {
        return;
    }

    let names: Vec<&str> = report
        .missing
        .iter()
        .take(MAX_MISSING_LISTED)
        .map(|e| e.name.as_str())
        .collect();
    let more = report.missing.len().saturating_sub(MAX_MISSING_LISTED);

    if more > 0 {
        let _ = writeln!(out, "    Missing: {} (+{} more)", names.join(", "), more);
    } else {
        let _ = writeln!(out, "    Missing: {}", names.join(", "));
    }
}

/// Render coverage results as text; files without a language profile are omitted
pub fn render_coverage(coverage: &[RuleCoverage]) -> String {
    let mut out = String::from("Coverage Report:\n");

    let mut all = Vec::new();
    for rule in coverage {
        let profiled: Vec<&CoverageReport> =
            rule.reports.iter().filter(|r| r.language.is_some()).collect();
        if profiled.is_empty() {
            continue;
        }

        let _ = writeln!(out, "{}", rule.doc.display());
        for report in profiled {
            render_report(&mut out, report);
        }
        all.extend(rule.reports.iter().cloned());
    }

    match average_score(&all) {
        Some(avg) => {
            let _ = writeln!(out, "\nTotal Coverage: {:.0}%", avg * 100.0);
        }
        None => out.push_str("\nTotal Coverage: n/a (no supported source files)\n"),
    }

    out
}

/// Print a check outcome in text format
pub fn print_check_text(outcome: &CheckOutcome) {
    print!("{}", render_verdicts(&outcome.results));

    if let Some(ref coverage) = outcome.coverage {
        println!();
        print!("{}", render_coverage(coverage));
    }
}

/// Print coverage results in text format
pub fn print_coverage_text(coverage: &[RuleCoverage]) {
    print!("{}", render_coverage(coverage));
}

/// Print any result as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}
