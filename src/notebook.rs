//! Notebook loading and the decoded document model.
//!
//! The loader decodes the `.ipynb` JSON into typed cells and fails fast on
//! anything that is not a well-formed notebook. Output payloads, execution
//! counts, and per-cell metadata are irrelevant here and are ignored during
//! deserialization.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A decoded notebook document.
///
/// Decoding requires the top-level cell sequence and format version;
/// a file missing either is rejected before any cell-level work starts.
#[derive(Debug, Deserialize)]
pub struct Notebook {
    pub cells: Vec<Cell>,
    pub nbformat: u32,
    #[serde(default)]
    pub nbformat_minor: u32,
}

/// One notebook cell.
#[derive(Debug, Deserialize)]
pub struct Cell {
    pub cell_type: String,
    #[serde(default)]
    pub source: SourceText,
}

/// Cell source as stored on disk: one string, or a list of line strings
/// where each line keeps its trailing newline.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SourceText {
    Block(String),
    Lines(Vec<String>),
}

impl Default for SourceText {
    fn default() -> Self {
        SourceText::Block(String::new())
    }
}

impl SourceText {
    /// Join into one text block, preserving the original line breaks
    pub fn as_text(&self) -> String {
        match self {
            SourceText::Block(text) => text.clone(),
            SourceText::Lines(lines) => lines.concat(),
        }
    }
}

/// Cell counts for the structure summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellCounts {
    pub total: usize,
    pub code: usize,
    pub markdown: usize,
}

impl Notebook {
    /// Load a notebook from a file path
    pub fn load(path: &Path) -> Result<Notebook> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read notebook {}", path.display()))?;

        Self::parse(&raw).with_context(|| format!("Invalid notebook document {}", path.display()))
    }

    /// Decode notebook JSON
    pub fn parse(raw: &str) -> Result<Notebook> {
        let notebook: Notebook =
            serde_json::from_str(raw).context("Not well-formed notebook JSON")?;
        Ok(notebook)
    }

    pub fn cell_counts(&self) -> CellCounts {
        let code = self
            .cells
            .iter()
            .filter(|c| c.cell_type == "code")
            .count();
        let markdown = self
            .cells
            .iter()
            .filter(|c| c.cell_type == "markdown")
            .count();
        CellCounts {
            total: self.cells.len(),
            code,
            markdown,
        }
    }
}
