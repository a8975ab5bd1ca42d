//! Bulk - Metrics
//!
//! Metrics tallies and reporting for the bulk pipeline.
//!
//! # Overview
//!
//! Two tiers of metrics:
//! - **Global**: `BulkMetrics` counts lines, data commands and flushed blocks.
//!   Owned by the batch manager and mutated only by the producer thread.
//! - **Per worker**: `WorkerMetrics` counts commands and blocks a single
//!   worker thread processed. Owned by that thread and handed back when it is
//!   joined, then collected into a `PoolReport`.
//!
//! # Design Principles
//!
//! - **Single writer**: Tallies are plain integers with exactly one writer
//! - **Read after join**: Per-worker tallies are only visible once the worker exits
//! - **Formatter trait**: Output format (human, JSON) is chosen at the edge
//!
//! # Example
//!
//! ```
//! use bulk_metrics::{BulkMetrics, HumanFormatter, MetricsFormatter};
//!
//! let mut metrics = BulkMetrics::default();
//! metrics.record_line();
//! metrics.record_command();
//! metrics.record_block();
//!
//! assert_eq!(HumanFormatter::new().format_main(&metrics), "main: 1 lines, 1 commands, 1 blocks");
//! ```

mod bulk;
pub mod format;
mod worker;

pub use bulk::BulkMetrics;
pub use format::{HumanFormatter, JsonFormatter, MetricsFormatter};
pub use worker::{PoolReport, WorkerMetrics};

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counter wrapper for metrics shared across threads
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    /// Create a new counter initialized to 0
    #[inline]
    pub const fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Increment the counter by `val` (relaxed ordering for performance)
    #[inline]
    pub fn add(&self, val: u64) {
        self.0.fetch_add(val, Ordering::Relaxed);
    }

    /// Increment the counter by 1
    #[inline]
    pub fn inc(&self) {
        self.add(1);
    }

    /// Get the current value (relaxed ordering)
    #[inline]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    /// Reset the counter to 0 and return the previous value
    #[inline]
    pub fn take(&self) -> u64 {
        self.0.swap(0, Ordering::Relaxed)
    }
}
