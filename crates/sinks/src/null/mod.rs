//! Null sink - discards all data
//!
//! Used for benchmarking the pipeline without any I/O overhead. It records
//! metrics for every batch and drops it.

use bulk_pipeline::{Batch, Sink, SinkError};

use crate::common::{MetricsSnapshot, SinkMetrics};

/// Null sink that discards all received batches
#[derive(Debug)]
pub struct NullSink {
    /// Sink name for logging
    name: String,

    /// Metrics for this sink
    metrics: SinkMetrics,
}

impl NullSink {
    /// Create a null sink named "null"
    pub fn new() -> Self {
        Self::with_name("null")
    }

    /// Create a null sink with a custom name
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metrics: SinkMetrics::new(),
        }
    }

    /// Get a snapshot of the sink metrics
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

impl Default for NullSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for NullSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&self, batch: &Batch) -> Result<usize, SinkError> {
        self.metrics.batch_written(batch.len() as u64);
        Ok(batch.len())
    }
}
