//! Metrics output formatters
//!
//! Formats the global tally and pool reports for humans or machines.

mod human;
mod json;

pub use human::HumanFormatter;
pub use json::JsonFormatter;

use crate::{BulkMetrics, PoolReport};

/// Trait for metrics formatters
pub trait MetricsFormatter: Send + Sync {
    /// Format the global tally
    fn format_main(&self, metrics: &BulkMetrics) -> String;

    /// Format a pool's final report
    fn format_pool(&self, report: &PoolReport) -> String;
}
