//! Executable fragment extraction.

use crate::notebook::Notebook;

/// One executable unit of source text, in document order.
#[derive(Debug, Clone)]
pub struct Fragment {
    /// 1-based position among executable cells only
    pub index: usize,
    /// Joined source text with the original line breaks
    pub source: String,
}

/// Iterate over a notebook's executable fragments.
///
/// Non-code cells are skipped entirely; indices stay contiguous over the
/// code cells that remain. A notebook with no code cells yields an empty
/// iterator, not an error.
pub fn executable_fragments(notebook: &Notebook) -> impl Iterator<Item = Fragment> + '_ {
    notebook
        .cells
        .iter()
        .filter(|cell| cell.cell_type == "code")
        .enumerate()
        .map(|(i, cell)| Fragment {
            index: i + 1,
            source: cell.source.as_text(),
        })
}
