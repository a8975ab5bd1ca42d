//! Worker pool (lane) configuration
//!
//! Each named pool is a set of worker threads shared by the sinks bound to it.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Default worker threads per pool
pub const DEFAULT_WORKERS: usize = 2;

/// Container for all pool configurations
///
/// # Example
///
/// ```toml
/// [pools.console]
/// workers = 1
///
/// [pools.file]
/// workers = 4
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PoolsConfig {
    /// Named pools
    #[serde(flatten)]
    pools: BTreeMap<String, WorkerPoolConfig>,
}

impl PoolsConfig {
    /// Get a pool by name
    pub fn get(&self, name: &str) -> Option<&WorkerPoolConfig> {
        self.pools.get(name)
    }

    /// Check if a pool exists
    pub fn contains(&self, name: &str) -> bool {
        self.pools.contains_key(name)
    }

    /// Iterate over all pools in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &WorkerPoolConfig)> {
        self.pools.iter()
    }

    /// Check if no pools are declared
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Worker count for a pool, falling back to the default
    pub fn workers(&self, name: &str) -> usize {
        self.get(name).map_or(DEFAULT_WORKERS, |p| p.workers)
    }
}

/// Configuration for a single pool
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkerPoolConfig {
    /// Worker threads
    /// Default: 2
    pub workers: usize,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
        }
    }
}
