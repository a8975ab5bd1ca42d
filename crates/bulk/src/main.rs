//! Bulk - Nesting-aware command batching
//!
//! Reads commands from stdin, groups them into batches and hands every batch
//! to each configured sink on its own worker pool.
//!
//! # Usage
//!
//! ```bash
//! # Batches of 3, default sinks (factorial to stdout, fibonacci to files)
//! bulk 3 < commands.txt
//!
//! # Custom sinks and pools
//! bulk --config bulk.toml --log-level debug
//! ```

mod cmd;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use bulk_config::{Config, LogConfig, LogFormat, LogOutput};
use clap::Parser;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cmd::run::RunArgs;

/// Bulk - Nesting-aware command batching
#[derive(Parser, Debug)]
#[command(name = "bulk")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Commands per batch outside explicit blocks. Overrides config file.
    capacity: Option<usize>,

    /// Path to configuration file (error if specified but not found)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let directive = config.log.directive(cli.log_level.as_deref());
    init_logging(&directive, &config.log)?;
    if config.log.output.shares_stdout() {
        tracing::warn!("logging to stdout, log lines will interleave with batch output");
    }

    cmd::run::run(
        config,
        RunArgs {
            capacity: cli.capacity,
        },
    )
}

/// Load the config file, or defaults when none is given
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(anyhow::anyhow!("config file not found: {}", path.display()));
            }
            Config::from_file(path).context("failed to load configuration")
        }
        None => "".parse::<Config>().context("failed to build default configuration"),
    }
}

/// Initialize the tracing subscriber for logging
fn init_logging(directive: &str, config: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_new(directive)
        .or_else(|_| EnvFilter::try_new(LogConfig::default().directive(None)))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let ansi = config.output.ansi();
    let writer = match &config.output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
        LogOutput::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {path}"))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
    };

    let (console, json) = match config.format {
        LogFormat::Console => (
            Some(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(ansi)
                    .with_target(true)
                    .with_thread_names(true),
            ),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_thread_names(true),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(json)
        .with(filter)
        .init();

    Ok(())
}
