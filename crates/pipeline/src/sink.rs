//! Sink interface
//!
//! A sink receives sealed batches on a worker thread. It must be `Send + Sync`
//! because a lane with several workers may call `update` concurrently.

use bulk_protocol::Batch;
use thiserror::Error;

/// Consumer of completed batches
pub trait Sink: Send + Sync {
    /// Human-readable name for logging
    fn name(&self) -> &str;

    /// Process one batch and return the number of commands handled
    ///
    /// The returned count is attributed to the worker that ran the call.
    fn update(&self, batch: &Batch) -> Result<usize, SinkError>;
}

/// Errors a sink can report for a single batch
#[derive(Debug, Error)]
pub enum SinkError {
    /// Failed to write output
    #[error("write failed: {0}")]
    Write(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The sink panicked while processing the batch
    #[error("sink panicked: {0}")]
    Panicked(String),
}

impl SinkError {
    /// Create a write error
    pub fn write(msg: impl Into<String>) -> Self {
        Self::Write(msg.into())
    }
}
