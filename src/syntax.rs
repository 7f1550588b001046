//! Parse-only Python syntax checking for executable fragments.

use rustpython_parser::{parse, Mode};

use crate::fragment::Fragment;
use crate::report::{Category, Diagnostic, Severity, SourceLocation};

/// Check one fragment's source against the Python grammar.
///
/// The fragment is never executed. Returns `None` when the source parses;
/// otherwise a single `syntax-error` diagnostic carrying the parser's
/// message verbatim and the error position within the cell text. Code
/// that is grammatical but semantically meaningless (unknown names,
/// unreachable branches) parses fine and is not flagged.
pub fn check_fragment(fragment: &Fragment) -> Option<Diagnostic> {
    let cleaned = blank_directives(&fragment.source);

    match parse(&cleaned, Mode::Module, "<fragment>") {
        Ok(_) => None,
        Err(err) => {
            let location = offset_to_location(&cleaned, err.offset.to_usize());
            Some(
                Diagnostic::new(
                    Severity::Error,
                    Category::SyntaxError,
                    Some(fragment.index),
                    err.error.to_string(),
                )
                .with_location(location.line, location.column),
            )
        }
    }
}

/// Blank out IPython magic and shell lines (`%...`, `!...`).
///
/// These are host-runtime directives, not Python. Blanking instead of
/// deleting keeps error line numbers aligned with the cell text the
/// author sees.
fn blank_directives(source: &str) -> String {
    source
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            if trimmed.starts_with('!') || trimmed.starts_with('%') {
                ""
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Convert a byte offset into a 1-based line/column position
fn offset_to_location(source: &str, offset: usize) -> SourceLocation {
    let clamped = offset.min(source.len());
    let prefix = source.get(..clamped).unwrap_or(source);

    let line = prefix.matches('\n').count() + 1;
    let column = match prefix.rfind('\n') {
        Some(pos) => prefix[pos + 1..].chars().count() + 1,
        None => prefix.chars().count() + 1,
    };

    SourceLocation { line, column }
}
