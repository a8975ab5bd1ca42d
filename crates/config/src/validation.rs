//! Configuration validation
//!
//! Validates config consistency:
//! - Batch capacity is at least 1
//! - Every pool has at least one worker
//! - Every sink's pool is declared (unless no pools are declared at all)
//! - File sinks have an output path

use crate::Config;
use crate::error::{ConfigError, Result};
use crate::sinks::SinkConfig;

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_bulk(config)?;
    validate_pools(config)?;
    validate_sinks(config)?;
    Ok(())
}

fn validate_bulk(config: &Config) -> Result<()> {
    if config.bulk.capacity == 0 {
        return Err(ConfigError::invalid_value(
            "section",
            "bulk",
            "capacity",
            "must be at least 1",
        ));
    }
    Ok(())
}

fn validate_pools(config: &Config) -> Result<()> {
    for (name, pool) in config.pools.iter() {
        if pool.workers == 0 {
            return Err(ConfigError::invalid_value(
                "pool",
                name,
                "workers",
                "must be at least 1",
            ));
        }
    }
    Ok(())
}

fn validate_sinks(config: &Config) -> Result<()> {
    for (name, sink) in config.sinks.iter() {
        let pool = sink.pool_name(name);
        if !config.pools.is_empty() && !config.pools.contains(pool) {
            return Err(ConfigError::unknown_pool(name, pool));
        }

        if let SinkConfig::File(file) = sink
            && file.path.trim().is_empty()
        {
            return Err(ConfigError::invalid_value(
                "sink",
                name,
                "path",
                "must not be empty",
            ));
        }
    }
    Ok(())
}
