//! Logging configuration
//!
//! The `[log]` section. Stdout carries batch output, so logs default to
//! stderr and the level only applies to bulk's own crates; dependencies stay
//! at `warn`.

use std::fmt;

use serde::Deserialize;

/// Tracing targets governed by the configured level
const BULK_TARGETS: &[&str] = &[
    "bulk",
    "bulk_config",
    "bulk_metrics",
    "bulk_pipeline",
    "bulk_protocol",
    "bulk_sinks",
];

/// Level applied to every target outside `BULK_TARGETS`
const DEPENDENCY_LEVEL: &str = "warn";

/// Log level
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Level name as accepted by `EnvFilter`
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Console,
    /// One JSON object per event
    Json,
}

/// Log destination
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Shares the stream with stdout sinks
    Stdout,
    #[default]
    Stderr,
    /// Appended to the file at this path
    #[serde(untagged)]
    File(String),
}

impl LogOutput {
    /// Whether log lines interleave with batch output on stdout
    pub fn shares_stdout(&self) -> bool {
        matches!(self, Self::Stdout)
    }

    /// Colors are only emitted on terminal streams
    pub fn ansi(&self) -> bool {
        !matches!(self, Self::File(_))
    }
}

/// `[log]` section
///
/// ```toml
/// [log]
/// level = "debug"
/// format = "json"
/// output = "/var/log/bulk.log"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
}

impl LogConfig {
    /// Build the `EnvFilter` directive
    ///
    /// `level_override` (the `--log-level` flag) wins over the configured
    /// level. A bare level is scoped to bulk's crates; anything containing
    /// `=` or `,` is taken as a complete directive and passed through.
    pub fn directive(&self, level_override: Option<&str>) -> String {
        let level = match level_override.map(str::trim) {
            Some(raw) if raw.contains(['=', ',']) => return raw.to_string(),
            Some(raw) if !raw.is_empty() => raw,
            _ => self.level.as_str(),
        };

        let mut directive = String::from(DEPENDENCY_LEVEL);
        for target in BULK_TARGETS {
            directive.push(',');
            directive.push_str(target);
            directive.push('=');
            directive.push_str(level);
        }
        directive
    }
}
