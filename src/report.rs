//! Diagnostics and the validation report.
//!
//! Findings from the syntax and instrumentation checks are collected into
//! one report with a pass/fail verdict and deterministic rendering. The
//! verdict fails iff at least one finding has error severity; any number
//! of warnings still passes.

use std::collections::BTreeSet;
use std::path::Path;

use colored::Colorize;
use serde::Deserialize;

use crate::instrument::LoggerCallCounts;
use crate::notebook::CellCounts;

/// Severity level for validation findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Warning - should be addressed but does not gate the run
    Warning,
    /// Error - fails the run
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Category of validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    /// The document never decoded; nothing else was checked
    MalformedDocument,
    /// A fragment's source does not parse as Python
    SyntaxError,
    /// Logger calls without a logging setup construct, or no instrumented
    /// fragment at all
    MissingInstrumentation,
    /// An expected import never appears in the document
    MissingDependency,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedDocument => write!(f, "malformed-document"),
            Self::SyntaxError => write!(f, "syntax-error"),
            Self::MissingInstrumentation => write!(f, "missing-instrumentation"),
            Self::MissingDependency => write!(f, "missing-dependency"),
        }
    }
}

/// Line/column position within a fragment's source text (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Fragment the finding refers to; `None` for document-level findings
    pub fragment: Option<usize>,
    pub category: Category,
    pub severity: Severity,
    pub message: String,
    /// Position within the fragment source, when the checker reports one
    pub location: Option<SourceLocation>,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        category: Category,
        fragment: Option<usize>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            fragment,
            category,
            severity,
            message: message.into(),
            location: None,
        }
    }

    /// Attach a source location to this finding
    pub fn with_location(mut self, line: usize, column: usize) -> Self {
        self.location = Some(SourceLocation { line, column });
        self
    }

    /// Display the finding with colored output
    pub fn display(&self) {
        let icon = match self.severity {
            Severity::Warning => "⚠".yellow(),
            Severity::Error => "✗".red(),
        };

        let target = match self.fragment {
            Some(index) => format!("fragment {}", index),
            None => "document".to_string(),
        };

        let location = match self.location {
            Some(loc) => format!(" (line {}, column {})", loc.line, loc.column),
            None => String::new(),
        };

        println!(
            "  {} {} [{}]: {}{}",
            icon,
            target.cyan(),
            self.category,
            self.message,
            location
        );
    }
}

/// Result of one validation run
#[derive(Debug)]
pub struct ValidationReport {
    /// Cell counts for the structure summary; `None` when the document
    /// never decoded
    pub cells: Option<CellCounts>,
    /// Number of executable fragments that were checked
    pub fragments_checked: usize,
    /// All findings, ordered document-level first, then by fragment index
    /// and category
    pub diagnostics: Vec<Diagnostic>,
    /// Module names imported anywhere in the document
    pub imports: BTreeSet<String>,
    /// Logger calls per severity level, aggregated across all fragments
    pub logger_calls: LoggerCallCounts,
}

impl ValidationReport {
    pub fn new(
        cells: CellCounts,
        fragments_checked: usize,
        mut diagnostics: Vec<Diagnostic>,
        imports: BTreeSet<String>,
        logger_calls: LoggerCallCounts,
    ) -> Self {
        // Stable sort keeps insertion order within one fragment+category,
        // so rendering is byte-identical across runs on the same input.
        diagnostics.sort_by_key(|d| (d.fragment.unwrap_or(0), d.category));
        Self {
            cells: Some(cells),
            fragments_checked,
            diagnostics,
            imports,
            logger_calls,
        }
    }

    /// Build the short-circuit report for a document that never decoded
    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            cells: None,
            fragments_checked: 0,
            diagnostics: vec![Diagnostic::new(
                Severity::Error,
                Category::MalformedDocument,
                None,
                message,
            )],
            imports: BTreeSet::new(),
            logger_calls: LoggerCallCounts::default(),
        }
    }

    /// Check if validation passed (no errors)
    pub fn is_pass(&self) -> bool {
        !self.has_errors()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Render the report to stdout.
    ///
    /// With `quiet` set, per-fragment ✓ lines and the import/call summary
    /// are suppressed; findings and the final counters always print.
    pub fn render(&self, path: &Path, quiet: bool) {
        println!("{}", "━".repeat(60).cyan());
        println!("Validating: {}", path.display());
        println!("{}", "━".repeat(60).cyan());

        if let Some(counts) = self.cells {
            println!(
                "{} notebook structure: {} cells ({} code, {} markdown)",
                "✓".green(),
                counts.total,
                counts.code,
                counts.markdown
            );
        }

        for diagnostic in self.diagnostics.iter().filter(|d| d.fragment.is_none()) {
            diagnostic.display();
        }

        for index in 1..=self.fragments_checked {
            let findings: Vec<&Diagnostic> = self
                .diagnostics
                .iter()
                .filter(|d| d.fragment == Some(index))
                .collect();

            if findings.is_empty() {
                if !quiet {
                    println!("  {} fragment {}", "✓".green(), index);
                }
            } else {
                for diagnostic in findings {
                    diagnostic.display();
                }
            }
        }

        if !quiet && !self.imports.is_empty() {
            let names: Vec<&str> = self.imports.iter().map(String::as_str).collect();
            println!("imports: {}", names.join(", "));
        }

        if !quiet && self.fragments_checked > 0 {
            let calls = &self.logger_calls;
            println!(
                "logger calls: debug={} info={} warning={} error={} critical={}",
                calls.debug, calls.info, calls.warning, calls.error, calls.critical
            );
        }

        println!("{}", "━".repeat(60).cyan());

        let errors = self.error_count();
        let warnings = self.warning_count();
        println!(
            "{} {} checked, {} {}, {} {}",
            self.fragments_checked,
            if self.fragments_checked == 1 {
                "fragment"
            } else {
                "fragments"
            },
            errors,
            if errors == 1 { "error" } else { "errors" },
            warnings,
            if warnings == 1 { "warning" } else { "warnings" },
        );

        if self.is_pass() {
            println!("{} validation passed", "✓".green());
        } else {
            println!("{} validation failed", "✗".red());
        }
    }
}
