//! Bulk Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! Minimal config should just work - only specify what you need to change.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use bulk_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[bulk]\ncapacity = 5").unwrap();
//! assert_eq!(config.bulk.capacity, 5);
//! ```
//!
//! # Example Full Config
//!
//! ```toml
//! [bulk]
//! capacity = 3
//! unterminated_block = "flush"
//!
//! [log]
//! level = "info"
//!
//! [metrics]
//! format = "human"
//!
//! [pools.console]
//! workers = 2
//!
//! [sinks.console]
//! type = "stream"
//! transform = "factorial"
//! ```

mod bulk;
mod error;
mod logging;
mod metrics;
mod pools;
mod sinks;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use bulk::{BlockPolicy, BulkConfig, DEFAULT_CAPACITY};
pub use error::{ConfigError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel, LogOutput};
pub use metrics::{MetricsConfig, MetricsFormat};
pub use pools::{DEFAULT_WORKERS, PoolsConfig, WorkerPoolConfig};
pub use sinks::{
    FileSinkConfig, NullSinkConfig, SinkConfig, SinksConfig, StreamSinkConfig, StreamTarget,
    TransformKind,
};

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Batching settings
    pub bulk: BulkConfig,

    /// Logging configuration
    pub log: LogConfig,

    /// Final metrics report configuration
    pub metrics: MetricsConfig,

    /// Named worker pools
    pub pools: PoolsConfig,

    /// Named sinks
    pub sinks: SinksConfig,
}

/// A sink resolved against its pool
#[derive(Debug, Clone)]
pub struct SinkBinding<'a> {
    /// Sink name
    pub name: &'a str,
    /// Sink settings
    pub sink: &'a SinkConfig,
    /// Pool the sink runs on
    pub pool: &'a str,
    /// Worker threads of that pool
    pub workers: usize,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or contains invalid TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        if config.sinks.is_empty() {
            config.sinks = SinksConfig::default_wiring();
        }
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// Runs before the default wiring is applied, so an empty `[sinks]` never
    /// fails pool checks.
    fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// Resolve every sink to its pool, in sink name order
    pub fn sink_bindings(&self) -> Vec<SinkBinding<'_>> {
        self.sinks
            .iter()
            .map(|(name, sink)| {
                let pool = sink.pool_name(name);
                SinkBinding {
                    name,
                    sink,
                    pool,
                    workers: self.pools.workers(pool),
                }
            })
            .collect()
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
