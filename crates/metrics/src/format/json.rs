//! JSON metrics formatter
//!
//! Formats metrics as single-line JSON objects for machine parsing.
//!
//! # Example Output
//!
//! ```json
//! {"type":"main","lines":9,"commands":7,"blocks":2}
//! {"type":"pool","pool":"console","submitted":2,"total_commands":7,"workers":[...]}
//! ```

use serde::Serialize;

use super::MetricsFormatter;
use crate::{BulkMetrics, PoolReport, WorkerMetrics};

/// JSON metrics formatter
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

#[derive(Serialize)]
struct MainJson<'a> {
    #[serde(rename = "type")]
    report_type: &'static str,
    #[serde(flatten)]
    metrics: &'a BulkMetrics,
}

#[derive(Serialize)]
struct PoolJson<'a> {
    #[serde(rename = "type")]
    report_type: &'static str,
    pool: &'a str,
    submitted: u64,
    total_commands: u64,
    total_blocks: u64,
    total_failures: u64,
    workers: &'a [WorkerMetrics],
}

impl MetricsFormatter for JsonFormatter {
    fn format_main(&self, metrics: &BulkMetrics) -> String {
        let json = MainJson {
            report_type: "main",
            metrics,
        };
        serde_json::to_string(&json).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
    }

    fn format_pool(&self, report: &PoolReport) -> String {
        let json = PoolJson {
            report_type: "pool",
            pool: &report.pool,
            submitted: report.submitted,
            total_commands: report.total_commands(),
            total_blocks: report.total_blocks(),
            total_failures: report.total_failures(),
            workers: &report.workers,
        };
        serde_json::to_string(&json).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
    }
}
