//! Gutter-marker aggregation over lint reports.
//!
//! The host's gutter shows at most one marker per line, so several reports on a line
//! collapse to the worst severity among them. Tooltips and the status-bar summary come
//! from the same report slice.

use crate::report::{LintReport, Severity};
use std::collections::BTreeMap;

/// Report counts by severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    /// Number of error reports.
    pub errors: usize,
    /// Number of warning reports.
    pub warnings: usize,
    /// Number of info reports.
    pub infos: usize,
}

impl SeverityCounts {
    /// Total report count.
    pub fn total(&self) -> usize {
        self.errors + self.warnings + self.infos
    }
}

/// Count reports by severity.
pub fn count_by_severity(reports: &[LintReport]) -> SeverityCounts {
    let mut counts = SeverityCounts::default();
    for report in reports {
        match report.severity {
            Severity::Error => counts.errors += 1,
            Severity::Warning => counts.warnings += 1,
            Severity::Info => counts.infos += 1,
        }
    }
    counts
}

/// The gutter marker per line: the worst severity among that line's reports.
///
/// Returns `(line, severity)` pairs in ascending line order.
pub fn markers_by_line(reports: &[LintReport]) -> Vec<(usize, Severity)> {
    let mut worst: BTreeMap<usize, Severity> = BTreeMap::new();
    for report in reports {
        worst
            .entry(report.line)
            .and_modify(|severity| *severity = (*severity).max(report.severity))
            .or_insert(report.severity);
    }
    worst.into_iter().collect()
}

/// All reports on one 1-indexed line, in delivery order.
pub fn reports_for_line(reports: &[LintReport], line: usize) -> Vec<&LintReport> {
    reports.iter().filter(|report| report.line == line).collect()
}

/// Tooltip text for one line: one `severity: [code] message` entry per report, or `None`
/// when the line is clean.
pub fn tooltip_for_line(reports: &[LintReport], line: usize) -> Option<String> {
    let on_line = reports_for_line(reports, line);
    if on_line.is_empty() {
        return None;
    }

    let lines: Vec<String> = on_line
        .iter()
        .map(|report| match &report.code {
            Some(code) => format!("{}: [{}] {}", report.severity, code, report.message),
            None => format!("{}: {}", report.severity, report.message),
        })
        .collect();
    Some(lines.join("\n"))
}
