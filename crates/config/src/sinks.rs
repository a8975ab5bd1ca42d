//! Sink configuration types
//!
//! Sinks are named instances, each bound to one worker pool. When no sink is
//! configured the default wiring applies: a factorial stream sink on the
//! `console` pool and a fibonacci file sink on the `file` pool.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Container for all sink configurations
///
/// # Example
///
/// ```toml
/// [sinks.console]
/// type = "stream"
/// transform = "factorial"
///
/// [sinks.archive]
/// type = "file"
/// pool = "file"
/// path = "logs/"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SinksConfig {
    /// Named sink instances
    #[serde(flatten)]
    sinks: BTreeMap<String, SinkConfig>,
}

impl SinksConfig {
    /// Get a sink by name
    pub fn get(&self, name: &str) -> Option<&SinkConfig> {
        self.sinks.get(name)
    }

    /// Iterate over all sinks in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &SinkConfig)> {
        self.sinks.iter()
    }

    /// Get the number of configured sinks
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Check if no sinks are configured
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Default wiring used when no sinks are configured
    pub fn default_wiring() -> Self {
        let mut sinks = BTreeMap::new();
        sinks.insert(
            "console".to_string(),
            SinkConfig::Stream(StreamSinkConfig {
                pool: Some("console".into()),
                transform: TransformKind::Factorial,
                ..StreamSinkConfig::default()
            }),
        );
        sinks.insert(
            "file".to_string(),
            SinkConfig::File(FileSinkConfig {
                pool: Some("file".into()),
                transform: TransformKind::Fibonacci,
                ..FileSinkConfig::default()
            }),
        );
        Self { sinks }
    }
}

/// Per-command transform applied by a sink
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    /// Payload unchanged (default)
    #[default]
    Identity,
    /// `n!`
    Factorial,
    /// `n`-th Fibonacci number
    Fibonacci,
}

/// Configuration for a single sink instance
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SinkConfig {
    /// Stream sink - one line per batch
    Stream(StreamSinkConfig),

    /// File sink - one file per batch
    File(FileSinkConfig),

    /// Null sink - discards all data
    Null(NullSinkConfig),
}

impl SinkConfig {
    /// Get the sink type name
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Stream(_) => "stream",
            Self::File(_) => "file",
            Self::Null(_) => "null",
        }
    }

    /// Pool this sink runs on; defaults to the sink's own name
    pub fn pool_name<'a>(&'a self, sink_name: &'a str) -> &'a str {
        let pool = match self {
            Self::Stream(c) => c.pool.as_deref(),
            Self::File(c) => c.pool.as_deref(),
            Self::Null(c) => c.pool.as_deref(),
        };
        pool.unwrap_or(sink_name)
    }
}

/// Stream destination
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StreamTarget {
    /// Process stdout (default)
    #[default]
    Stdout,
    /// Process stderr
    Stderr,
}

/// Stream sink configuration
///
/// # Example
///
/// ```toml
/// [sinks.console]
/// type = "stream"
/// target = "stdout"
/// transform = "factorial"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StreamSinkConfig {
    /// Pool name
    /// Default: the sink name
    pub pool: Option<String>,

    /// Output stream
    /// Default: stdout
    pub target: StreamTarget,

    /// Per-command transform
    /// Default: identity
    pub transform: TransformKind,
}

/// File sink configuration
///
/// # Example
///
/// ```toml
/// [sinks.archive]
/// type = "file"
/// path = "logs/"
/// transform = "fibonacci"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FileSinkConfig {
    /// Pool name
    /// Default: the sink name
    pub pool: Option<String>,

    /// Output directory
    /// Default: "."
    pub path: String,

    /// Per-command transform
    /// Default: identity
    pub transform: TransformKind,
}

impl Default for FileSinkConfig {
    fn default() -> Self {
        Self {
            pool: None,
            path: ".".into(),
            transform: TransformKind::Identity,
        }
    }
}

/// Null sink configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NullSinkConfig {
    /// Pool name
    /// Default: the sink name
    pub pool: Option<String>,
}
