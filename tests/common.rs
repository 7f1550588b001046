//! Common test helpers for integration tests

use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

/// Write a notebook whose code cells hold the given sources.
/// Returns the path to the written file.
pub fn write_notebook(dir: &Path, name: &str, code_sources: &[&str]) -> PathBuf {
    let cells: Vec<serde_json::Value> = code_sources
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
        "metadata": {"kernelspec": {"name": "python3", "display_name": "Python 3"}},
        "nbformat": 4,
        "nbformat_minor": 5,
    });

    let path = dir.join(name);
    fs::write(&path, notebook.to_string()).expect("Failed to write notebook");
    path
}

/// A fully instrumented code cell: import, setup, and logger calls.
pub const INSTRUMENTED_CELL: &str = "import logging\n\
    logging.basicConfig(level=logging.INFO)\n\
    logger = logging.getLogger(__name__)\n\
    logger.info(\"pipeline ready\")\n";
