//! Human-readable metrics formatter
//!
//! # Example Output
//!
//! ```text
//! main: 9 lines, 7 commands, 2 blocks
//! console: 1 blocks, 2 commands
//! console: 1 blocks, 5 commands
//! file: 2 blocks, 7 commands
//! file: 0 blocks, 0 commands
//! ```

use super::MetricsFormatter;
use crate::{BulkMetrics, PoolReport};

/// Human-readable metrics formatter
#[derive(Debug, Clone, Default)]
pub struct HumanFormatter;

impl HumanFormatter {
    /// Create a new human formatter
    pub fn new() -> Self {
        Self
    }
}

impl MetricsFormatter for HumanFormatter {
    fn format_main(&self, metrics: &BulkMetrics) -> String {
        format!("main: {}", metrics)
    }

    fn format_pool(&self, report: &PoolReport) -> String {
        report.to_string()
    }
}
