//! Accumulated errors and warnings produced while translating an A program.
//!
//! Handlers never abort on malformed input (see [`crate::context::CompilationContext`]);
//! instead they push a [`Diagnostic`] here and keep going with a syntactically
//! safe substitution. Only after the whole file has been consumed does the
//! driver decide whether to write `output.c`, based on [`Diagnostics::has_errors`].

use std::error::Error;
use std::fmt::{self, Display};

/// A lower bound, not a hard ceiling (see spec §9 open questions): once hit,
/// further records are dropped rather than panicking or reallocating without end.
const MAX_RECORDS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}

/// A single accumulated problem, attributed to the line that introduced it
/// (for a block, that is the line that opened it, not the line that failed
/// to close it).
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub message: String,
    pub line: usize,
    pub severity: Severity,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (line {})", self.message, self.line)
    }
}

impl Error for Diagnostic {}

/// Insertion-ordered list of [`Diagnostic`]s, reported grouped by severity.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
    overflowed: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, line: usize, message: impl Into<String>) {
        self.push(Diagnostic {
            message: message.into(),
            line,
            severity: Severity::Error,
        });
    }

    pub fn warning(&mut self, line: usize, message: impl Into<String>) {
        self.push(Diagnostic {
            message: message.into(),
            line,
            severity: Severity::Warning,
        });
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        if self.records.len() >= MAX_RECORDS {
            self.overflowed = true;
            return;
        }
        self.records.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.records
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    /// Grouped end-of-run report: errors first, then warnings, each numbered
    /// within its own severity, followed by a one-line summary.
    pub fn report(&self) -> String {
        let mut out = String::new();

        let errors: Vec<_> = self
            .records
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .collect();
        let warnings: Vec<_> = self
            .records
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .collect();

        out.push_str(&format!("Found {} issue(s)\n", self.records.len()));

        if !errors.is_empty() {
            out.push_str("Errors:\n");
            for (i, d) in errors.iter().enumerate() {
                out.push_str(&format!("  {}. {}\n", i + 1, d));
            }
        }

        if !warnings.is_empty() {
            out.push_str("Warnings:\n");
            for (i, d) in warnings.iter().enumerate() {
                out.push_str(&format!("  {}. {}\n", i + 1, d));
            }
        }

        if self.overflowed {
            out.push_str(&format!(
                "... additional issues were dropped past the {MAX_RECORDS}-record limit\n"
            ));
        }

        out.push_str(&format!(
            "summary: {} error(s), {} warning(s)\n",
            errors.len(),
            warnings.len()
        ));

        out
    }
}
