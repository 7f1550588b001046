//! Validation policy configuration.
//!
//! The expected import names and the warning/error boundary for the two
//! policy-driven categories are supplied from outside: a YAML config file,
//! command-line flags, or the built-in defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::report::Severity;

fn default_true() -> bool {
    true
}

fn default_missing_instrumentation() -> Severity {
    Severity::Warning
}

fn default_missing_dependency() -> Severity {
    Severity::Error
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Imports that must appear somewhere in the document
    #[serde(default)]
    pub required_imports: Vec<String>,
    /// Imports whose absence is reported as a warning only
    #[serde(default)]
    pub recommended_imports: Vec<String>,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub severity: SeverityConfig,
}

/// Document-level validation policy
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    /// Require at least one fragment in the document to emit logger calls
    /// (default: true)
    #[serde(default = "default_true")]
    pub require_instrumented_fragment: bool,
}

/// Severity overrides for the policy-driven finding categories
#[derive(Debug, Clone, Deserialize)]
pub struct SeverityConfig {
    /// Severity of missing-instrumentation findings (default: warning)
    #[serde(default = "default_missing_instrumentation")]
    pub missing_instrumentation: Severity,
    /// Severity of missing required imports (default: error)
    #[serde(default = "default_missing_dependency")]
    pub missing_dependency: Severity,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            required_imports: Vec::new(),
            recommended_imports: Vec::new(),
            policy: PolicyConfig::default(),
            severity: SeverityConfig::default(),
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            require_instrumented_fragment: true,
        }
    }
}

impl Default for SeverityConfig {
    fn default() -> Self {
        Self {
            missing_instrumentation: default_missing_instrumentation(),
            missing_dependency: default_missing_dependency(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse validation config")
    }
}
