//! Common types shared by all sinks

use bulk_metrics::Counter;

/// Metrics shared by all sink types
///
/// Updated concurrently by every worker that calls the sink.
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Total batches successfully written
    batches_written: Counter,

    /// Total commands written (sum of batch lengths)
    commands_written: Counter,

    /// Write errors encountered
    write_errors: Counter,
}

impl SinkMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            batches_written: Counter::new(),
            commands_written: Counter::new(),
            write_errors: Counter::new(),
        }
    }

    /// Record a successfully written batch
    #[inline]
    pub fn batch_written(&self, command_count: u64) {
        self.batches_written.inc();
        self.commands_written.add(command_count);
    }

    /// Record a write error
    #[inline]
    pub fn write_error(&self) {
        self.write_errors.inc();
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            batches_written: self.batches_written.get(),
            commands_written: self.commands_written.get(),
            write_errors: self.write_errors.get(),
        }
    }
}

/// Point-in-time snapshot of sink metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub batches_written: u64,
    pub commands_written: u64,
    pub write_errors: u64,
}
