//! Lint report data model.

use std::fmt;

/// Severity of a lint report.
///
/// Ordered so that `max` picks the worst: `Info < Warning < Error`. Gutter aggregation
/// relies on this when several reports land on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational finding (conventions, refactor hints).
    Info,
    /// Something suspicious but not necessarily wrong.
    Warning,
    /// A definite problem.
    Error,
}

impl Severity {
    /// The stable lowercase name (`"error"`, `"warning"`, `"info"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    /// Parse a severity name as emitted by JSON-format linters.
    ///
    /// Accepts the pylint type vocabulary as well (`"fatal"`, `"convention"`,
    /// `"refactor"`); unknown names map to `Info`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "error" | "fatal" => Self::Error,
            "warning" => Self::Warning,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finding reported by an external linter.
///
/// Coordinates use the buffer convention: 1-indexed lines, 0-indexed columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintReport {
    /// 1-indexed line the finding is on.
    pub line: usize,
    /// 0-indexed column the finding starts at.
    pub column: usize,
    /// Human-readable message.
    pub message: String,
    /// Severity of the finding.
    pub severity: Severity,
    /// The linter's own code for the finding (`"E501"`, `"C0114"`, ...), if it has one.
    pub code: Option<String>,
}

impl fmt::Display for LintReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(
                f,
                "{}:{}: {} [{}] {}",
                self.line, self.column, self.severity, code, self.message
            ),
            None => write!(
                f,
                "{}:{}: {} {}",
                self.line, self.column, self.severity, self.message
            ),
        }
    }
}
