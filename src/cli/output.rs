//! Result rendering for the `scan` command.

use super::display_path;
use console::{style, Term};
use dupli_pic_finder::core::finder::RunReport;
use dupli_pic_finder::core::grouper::{group_pairs, DuplicateGroup};
use dupli_pic_finder::core::hasher::HashAlgorithmKind;
use dupli_pic_finder::core::matcher::DuplicatePair;
use serde_json::{json, Value};
use std::path::Path;

/// What one scan produced, borrowed for rendering
pub struct Summary<'a> {
    pub root: &'a Path,
    pub tolerance: i64,
    pub algorithm: HashAlgorithmKind,
    pub report: &'a RunReport,
    pub pairs: &'a [DuplicatePair],
}

pub fn print_pretty(term: &Term, summary: &Summary<'_>, groups: bool, verbose: bool) {
    let report = summary.report;

    term.write_line(&format!("{} Scan Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} images scanned in {:.1}s ({})",
        style(report.total_candidates).cyan(),
        report.duration_ms as f64 / 1000.0,
        summary.algorithm
    ))
    .ok();
    if verbose {
        term.write_line(&format!("  {}", style(summary.algorithm.description()).dim()))
            .ok();
    }
    term.write_line(&format!(
        "  {} duplicate pairs at tolerance {}",
        style(summary.pairs.len()).cyan(),
        summary.tolerance
    ))
    .ok();

    if !report.failures.is_empty() {
        term.write_line(&format!(
            "  {} images could not be read",
            style(report.failures.len()).yellow()
        ))
        .ok();
    }
    if report.cancelled {
        term.write_line(&format!("  {}", style("Scan was cancelled early").yellow()))
            .ok();
    }

    term.write_line("").ok();

    if summary.pairs.is_empty() {
        term.write_line(&format!("  {}", style("No duplicates found.").green()))
            .ok();
    } else if groups {
        print_groups(term, &group_pairs(summary.pairs));
    } else {
        print_pairs(term, summary.pairs);
    }

    if !report.failures.is_empty() && verbose {
        term.write_line(&format!("{}", style("Unreadable images:").bold().underlined()))
            .ok();
        for failure in &report.failures {
            term.write_line(&format!(
                "  {} {}: {}",
                style("!").yellow(),
                display_path(&failure.path),
                style(&failure.reason).dim()
            ))
            .ok();
        }
        term.write_line("").ok();
    }

    term.write_line(&format!(
        "{}",
        style("No files were deleted. Use `duplipic review` to act on these results.").dim()
    ))
    .ok();
}

fn print_pairs(term: &Term, pairs: &[DuplicatePair]) {
    term.write_line(&format!("{}", style("Duplicate Pairs:").bold().underlined()))
        .ok();
    term.write_line("").ok();

    for (i, pair) in pairs.iter().enumerate() {
        term.write_line(&format!(
            "  {} {}",
            style(format!("{:>3}.", i + 1)).bold(),
            display_path(pair.first())
        ))
        .ok();
        term.write_line(&format!(
            "       {} {}",
            display_path(pair.second()),
            style(format!("(distance {})", pair.distance())).dim()
        ))
        .ok();
    }
    term.write_line("").ok();
}

fn print_groups(term: &Term, groups: &[DuplicateGroup]) {
    term.write_line(&format!("{}", style("Duplicate Groups:").bold().underlined()))
        .ok();
    term.write_line("").ok();

    for (i, group) in groups.iter().enumerate() {
        term.write_line(&format!(
            "  {} {} images ({} removable), {} pairs, max distance {}",
            style(format!("Group {}:", i + 1)).bold(),
            group.members.len(),
            group.redundant_count(),
            group.pair_count,
            group.max_distance
        ))
        .ok();

        for (idx, member) in group.members.iter().enumerate() {
            let marker = if idx == 0 {
                style("★").green().to_string()
            } else {
                style("○").dim().to_string()
            };
            term.write_line(&format!("    {} {}", marker, display_path(member)))
                .ok();
        }
        term.write_line("").ok();
    }
}

pub fn print_json(summary: &Summary<'_>, groups: bool) {
    let report = summary.report;

    let mut output = json!({
        "root": summary.root.display().to_string(),
        "tolerance": summary.tolerance,
        "algorithm": summary.algorithm.to_string(),
        "total_candidates": report.total_candidates,
        "hashed": report.hashed,
        "cancelled": report.cancelled,
        "duration_ms": report.duration_ms,
        "pairs": summary.pairs.iter().map(|p| {
            json!({
                "first": p.first().display().to_string(),
                "second": p.second().display().to_string(),
                "distance": p.distance(),
            })
        }).collect::<Vec<_>>(),
        "failures": report.failures.iter().map(|f| {
            json!({
                "path": f.path.display().to_string(),
                "reason": f.reason,
            })
        }).collect::<Vec<_>>(),
    });

    if groups {
        output["groups"] = Value::Array(
            group_pairs(summary.pairs)
                .iter()
                .map(|g| {
                    json!({
                        "members": g.members.iter().map(|m| m.display().to_string()).collect::<Vec<_>>(),
                        "redundant": g.redundant_count(),
                        "pair_count": g.pair_count,
                        "max_distance": g.max_distance,
                    })
                })
                .collect(),
        );
    }

    println!("{:#}", output);
}

/// Pairs as `first<TAB>second`, or with groups the removable copies one per line
pub fn print_minimal(pairs: &[DuplicatePair], groups: bool) {
    if groups {
        for group in group_pairs(pairs) {
            for member in group.members.iter().skip(1) {
                println!("{}", member.display());
            }
        }
    } else {
        for pair in pairs {
            println!("{}\t{}", pair.first().display(), pair.second().display());
        }
    }
}
