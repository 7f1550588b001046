//! Instrumentation pattern checks.
//!
//! Textual presence checks over fragment source: the logging setup
//! construct, logger call counting per severity level, and import capture
//! for the document-scoped dependency check. Matching is lexical, not
//! semantic - an unusual spelling that achieves the same effect counts
//! as absent.

use std::collections::BTreeSet;

use regex::Regex;

use crate::config::Config;
use crate::fragment::Fragment;
use crate::report::{Category, Diagnostic, Severity};

/// Pattern for logger invocation calls, capturing the severity level
const LOGGER_CALL_PATTERN: &str = r"\blogger\.(debug|info|warning|error|critical)\(";

/// Pattern for top-level import statements, capturing the module name
const IMPORT_PATTERN: &str = r"(?m)^(?:from|import)\s+(\w+)";

/// Logger calls per severity level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoggerCallCounts {
    pub debug: usize,
    pub info: usize,
    pub warning: usize,
    pub error: usize,
    pub critical: usize,
}

impl LoggerCallCounts {
    pub fn total(&self) -> usize {
        self.debug + self.info + self.warning + self.error + self.critical
    }

    pub fn merge(&mut self, other: &LoggerCallCounts) {
        self.debug += other.debug;
        self.info += other.info;
        self.warning += other.warning;
        self.error += other.error;
        self.critical += other.critical;
    }
}

/// Count logger invocation calls in one source text, per severity level
pub fn count_logger_calls(source: &str) -> LoggerCallCounts {
    let mut counts = LoggerCallCounts::default();

    let re = match Regex::new(LOGGER_CALL_PATTERN) {
        Ok(r) => r,
        Err(_) => return counts,
    };

    for capture in re.captures_iter(source) {
        match &capture[1] {
            "debug" => counts.debug += 1,
            "info" => counts.info += 1,
            "warning" => counts.warning += 1,
            "error" => counts.error += 1,
            "critical" => counts.critical += 1,
            _ => {}
        }
    }

    counts
}

/// True when the source establishes a logging configuration
fn has_logging_setup(source: &str) -> bool {
    source.contains("logging.basicConfig") || source.contains("logging.getLogger")
}

/// Check one fragment for logger calls without a logging setup construct.
///
/// Instrumentation is opt-in per fragment: a fragment with neither calls
/// nor setup is not flagged; a fragment with calls but no setup is. The
/// call counts are returned alongside so the aggregate summary can be
/// built in the same scan.
pub fn inspect_fragment(
    fragment: &Fragment,
    config: &Config,
) -> (Option<Diagnostic>, LoggerCallCounts) {
    let counts = count_logger_calls(&fragment.source);

    if counts.total() > 0 && !has_logging_setup(&fragment.source) {
        let diagnostic = Diagnostic::new(
            config.severity.missing_instrumentation,
            Category::MissingInstrumentation,
            Some(fragment.index),
            format!(
                "{} logger call(s) but no logging setup (logging.basicConfig or logging.getLogger)",
                counts.total()
            ),
        );
        (Some(diagnostic), counts)
    } else {
        (None, counts)
    }
}

/// Collect imported module names across all fragments.
///
/// Presence anywhere in the document satisfies the dependency check, so
/// the names are pooled document-wide rather than per fragment.
pub fn collect_imports(fragments: &[Fragment]) -> BTreeSet<String> {
    let mut imports = BTreeSet::new();

    let re = match Regex::new(IMPORT_PATTERN) {
        Ok(r) => r,
        Err(_) => return imports,
    };

    for fragment in fragments {
        for capture in re.captures_iter(&fragment.source) {
            imports.insert(capture[1].to_string());
        }
    }

    imports
}

/// Document-scoped dependency check.
///
/// Every configured required import must appear somewhere in the
/// document; recommended imports only warn when absent.
pub fn check_dependencies(imports: &BTreeSet<String>, config: &Config) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for name in &config.required_imports {
        if !imports.contains(name) {
            diagnostics.push(Diagnostic::new(
                config.severity.missing_dependency,
                Category::MissingDependency,
                None,
                format!("required import '{}' not found in any fragment", name),
            ));
        }
    }

    for name in &config.recommended_imports {
        if !imports.contains(name) {
            diagnostics.push(Diagnostic::new(
                Severity::Warning,
                Category::MissingDependency,
                None,
                format!("recommended import '{}' not found in any fragment", name),
            ));
        }
    }

    diagnostics
}
