//! One validation run, loader through report.

use std::path::Path;

use tracing::debug;

use crate::config::Config;
use crate::fragment::{self, Fragment};
use crate::instrument::{self, LoggerCallCounts};
use crate::notebook::Notebook;
use crate::report::{Category, Diagnostic, ValidationReport};
use crate::syntax;

/// Validate one notebook file and build the run's report.
///
/// A document that fails to load short-circuits to a failing report with
/// a single document-level finding. Everything else is batched: a syntax
/// error in one fragment never blocks the checks on the next, so one run
/// surfaces every problem at once.
pub fn validate_notebook(path: &Path, config: &Config) -> ValidationReport {
    let notebook = match Notebook::load(path) {
        Ok(notebook) => notebook,
        Err(err) => {
            debug!(path = %path.display(), "notebook failed to load");
            return ValidationReport::malformed(format!("{:#}", err));
        }
    };

    let cells = notebook.cell_counts();
    let fragments: Vec<Fragment> = fragment::executable_fragments(&notebook).collect();
    debug!(
        fragments = fragments.len(),
        cells = cells.total,
        "extracted executable fragments"
    );

    let mut diagnostics = Vec::new();
    let mut logger_calls = LoggerCallCounts::default();

    for fragment in &fragments {
        if let Some(diagnostic) = syntax::check_fragment(fragment) {
            diagnostics.push(diagnostic);
        }

        let (diagnostic, counts) = instrument::inspect_fragment(fragment, config);
        if let Some(diagnostic) = diagnostic {
            diagnostics.push(diagnostic);
        }
        logger_calls.merge(&counts);
    }

    // Document-scoped checks run once, after every fragment was scanned.
    let imports = instrument::collect_imports(&fragments);
    diagnostics.extend(instrument::check_dependencies(&imports, config));

    if config.policy.require_instrumented_fragment
        && !fragments.is_empty()
        && logger_calls.total() == 0
    {
        diagnostics.push(Diagnostic::new(
            config.severity.missing_instrumentation,
            Category::MissingInstrumentation,
            None,
            "no fragment emits logger calls; at least one instrumented fragment is expected",
        ));
    }

    ValidationReport::new(cells, fragments.len(), diagnostics, imports, logger_calls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Severity;
    use serde_json::json;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Write a notebook whose code cells hold the given sources.
    fn write_notebook(dir: &TempDir, sources: &[&str]) -> PathBuf {
        let cells: Vec<serde_json::Value> = sources
            .iter()
            .map(|source| {
                json!({
                    "cell_type": "code",
                    "metadata": {},
                    "outputs": [],
                    "source": source,
                })
            })
            .collect();

        let notebook = json!({
            "cells": cells,
            "metadata": {},
            "nbformat": 4,
            "nbformat_minor": 5,
        });

        let path = dir.path().join("test.ipynb");
        fs::write(&path, notebook.to_string()).unwrap();
        path
    }

    /// Config with every policy check disabled, to isolate single checks.
    fn bare_config() -> Config {
        let mut config = Config::default();
        config.policy.require_instrumented_fragment = false;
        config
    }

    #[test]
    fn test_empty_notebook_passes_with_zero_fragments() {
        let tmp = TempDir::new().unwrap();
        let path = write_notebook(&tmp, &[]);

        let report = validate_notebook(&path, &Config::default());

        assert!(report.is_pass());
        assert_eq!(report.fragments_checked, 0);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_syntax_error_names_the_right_fragment() {
        let tmp = TempDir::new().unwrap();
        let path = write_notebook(&tmp, &["x = 1\n", "def f(:", "y = 2\n"]);

        let report = validate_notebook(&path, &bare_config());

        assert!(!report.is_pass());
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].category, Category::SyntaxError);
        assert_eq!(report.diagnostics[0].fragment, Some(2));
        assert_eq!(report.fragments_checked, 3);
    }

    #[test]
    fn test_one_syntax_diagnostic_per_unparsable_fragment() {
        let tmp = TempDir::new().unwrap();
        let path = write_notebook(&tmp, &["def f(:", "ok = 1\n", "def g(:"]);

        let report = validate_notebook(&path, &bare_config());

        let syntax_errors: Vec<_> = report
            .diagnostics
            .iter()
            .filter(|d| d.category == Category::SyntaxError)
            .collect();
        assert_eq!(syntax_errors.len(), 2);
        assert_eq!(syntax_errors[0].fragment, Some(1));
        assert_eq!(syntax_errors[1].fragment, Some(3));
    }

    #[test]
    fn test_calls_without_setup_warns_but_passes() {
        let tmp = TempDir::new().unwrap();
        let path = write_notebook(&tmp, &["logger.info(\"x\")\n"]);

        let report = validate_notebook(&path, &Config::default());

        assert!(report.is_pass());
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(
            report.diagnostics[0].category,
            Category::MissingInstrumentation
        );
        assert_eq!(report.diagnostics[0].severity, Severity::Warning);
        assert_eq!(report.diagnostics[0].fragment, Some(1));
    }

    #[test]
    fn test_no_instrumentation_at_all_is_not_flagged_per_fragment() {
        // Counterpart of test_calls_without_setup_warns_but_passes: with the
        // document policy off, a fragment with neither calls nor setup is
        // completely clean.
        let tmp = TempDir::new().unwrap();
        let path = write_notebook(&tmp, &["x = compute()\n"]);

        let report = validate_notebook(&path, &bare_config());

        assert!(report.is_pass());
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_uninstrumented_document_warns_when_policy_requires_it() {
        let tmp = TempDir::new().unwrap();
        let path = write_notebook(&tmp, &["x = compute()\n"]);

        let report = validate_notebook(&path, &Config::default());

        assert!(report.is_pass());
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].fragment, None);
        assert_eq!(
            report.diagnostics[0].category,
            Category::MissingInstrumentation
        );
    }

    #[test]
    fn test_dependency_satisfied_anywhere_in_document() {
        let tmp = TempDir::new().unwrap();
        let path = write_notebook(
            &tmp,
            &[
                "import logging\nlogging.basicConfig()\nlogger = logging.getLogger(__name__)\nlogger.info(\"up\")\n",
                "a = 1\n",
                "b = 2\n",
                "c = 3\n",
                "import pandas\n",
            ],
        );

        let mut config = Config::default();
        config.required_imports = vec!["logging".to_string(), "pandas".to_string()];

        let report = validate_notebook(&path, &config);
        assert!(report.is_pass());
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_missing_required_dependency_fails() {
        let tmp = TempDir::new().unwrap();
        let path = write_notebook(&tmp, &["x = 1\n"]);

        let mut config = bare_config();
        config.required_imports = vec!["pandas".to_string()];

        let report = validate_notebook(&path, &config);

        assert!(!report.is_pass());
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].category, Category::MissingDependency);
        assert_eq!(report.diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn test_malformed_file_short_circuits() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.ipynb");
        fs::write(&path, "{this is not json").unwrap();

        let report = validate_notebook(&path, &Config::default());

        assert!(!report.is_pass());
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].category, Category::MalformedDocument);
        assert_eq!(report.fragments_checked, 0);
    }

    #[test]
    fn test_missing_file_short_circuits() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nope.ipynb");

        let report = validate_notebook(&path, &Config::default());

        assert!(!report.is_pass());
        assert_eq!(report.diagnostics[0].category, Category::MalformedDocument);
    }

    #[test]
    fn test_logger_calls_aggregated_across_fragments() {
        let tmp = TempDir::new().unwrap();
        let path = write_notebook(
            &tmp,
            &[
                "import logging\nlogging.basicConfig()\nlogger = logging.getLogger(__name__)\nlogger.info(\"a\")\nlogger.info(\"b\")\n",
                "logger.warning(\"c\")\nlogger = logging.getLogger(\"x\")\n",
            ],
        );

        let report = validate_notebook(&path, &Config::default());

        assert_eq!(report.logger_calls.info, 2);
        assert_eq!(report.logger_calls.warning, 1);
        assert_eq!(report.logger_calls.total(), 3);
    }

    #[test]
    fn test_repeated_runs_produce_identical_diagnostics() {
        let tmp = TempDir::new().unwrap();
        let path = write_notebook(&tmp, &["def f(:", "logger.info(\"x\")\n"]);

        let config = Config::default();
        let first = validate_notebook(&path, &config);
        let second = validate_notebook(&path, &config);

        assert_eq!(first.diagnostics, second.diagnostics);
        assert_eq!(first.imports, second.imports);
        assert_eq!(first.logger_calls, second.logger_calls);
    }
}
