//! Console report lines for a batch run.

use std::fmt::Write as _;
use std::path::Path;

use crate::batch::{BatchConfig, BatchStats, FileReport};
use crate::types::FileVerdict;

/// One line for a processed file; skipped files produce none.
#[must_use]
pub fn format_report(report: &FileReport, dry_run: bool) -> Option<String> {
    let tag = match report.verdict {
        FileVerdict::Skip => return None,
        FileVerdict::Applied(_) => "[CHANGED]",
        FileVerdict::NoChanges => "[OK]     ",
    };
    Some(format!(
        "{tag} {} -> {}",
        report.path.display(),
        report.verdict.reason(dry_run)
    ))
}

/// One line for a failed file.
#[must_use]
pub fn format_error(path: &Path, message: &str) -> String {
    format!("[ERROR]   {} -> {message}", path.display())
}

/// Closing totals line.
#[must_use]
pub fn format_summary(stats: &BatchStats, config: &BatchConfig) -> String {
    format!(
        "Done. Scanned: {}, changed: {}, skipped: {}, failed: {}, dry-run: {}, backups: {}",
        stats.files_scanned,
        stats.files_changed,
        stats.files_skipped,
        stats.files_failed,
        config.dry_run,
        config.backup
    )
}

/// Full report: file lines (with diffs when present), errors, then totals.
#[must_use]
pub fn render(stats: &BatchStats, config: &BatchConfig) -> String {
    let mut out = String::new();
    for report in &stats.reports {
        if let Some(line) = format_report(report, config.dry_run) {
            let _ = writeln!(out, "{line}");
        }
        if let Some(diff) = &report.diff {
            out.push_str(diff);
        }
    }
    for (path, message) in &stats.errors {
        let _ = writeln!(out, "{}", format_error(path, message));
    }
    let _ = write!(out, "\n{}", format_summary(stats, config));
    out
}
