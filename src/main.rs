//! CLI entry point for nbvet.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use nbvet::config::Config;
use nbvet::pipeline::validate_notebook;

#[derive(Parser)]
#[command(name = "nbvet")]
#[command(version)]
#[command(
    about = "Validate notebook structure, Python syntax, and logging instrumentation",
    long_about = None
)]
struct Cli {
    /// Notebook file to validate
    #[arg(default_value = nbvet::DEFAULT_NOTEBOOK)]
    notebook: PathBuf,

    /// Validation config file (YAML)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Require an import to be present somewhere in the notebook
    /// (repeatable; extends the configured list)
    #[arg(long = "require", value_name = "NAME")]
    require: Vec<String>,

    /// Print findings and the summary only, no per-fragment detail
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Initialize tracing (respects RUST_LOG env var); the report itself
    // goes to stdout, logs stay on stderr.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::default(),
    };
    for name in cli.require {
        if !config.required_imports.contains(&name) {
            config.required_imports.push(name);
        }
    }

    let report = validate_notebook(&cli.notebook, &config);
    report.render(&cli.notebook, cli.quiet);

    if !report.is_pass() {
        std::process::exit(1);
    }
    Ok(())
}
