//! Bulk - Sinks
//!
//! Output sinks for the bulk pipeline.
//!
//! # Architecture
//!
//! Each sink implements `bulk_pipeline::Sink` and is called on a worker thread
//! of the lane it is subscribed to. Sinks on multi-worker lanes see concurrent
//! `update` calls and serialize internally.
//!
//! ```text
//! [BulkManager] --Arc<Batch>--> [WorkerPool] --> Sink::update --> [Destination]
//! ```
//!
//! # Available Sinks
//!
//! | Sink | Purpose | Output |
//! |------|---------|--------|
//! | `null` | Benchmarking (discard all) | None |
//! | `stream` | Console output | One `bulk: ...` line per batch |
//! | `file` | Per-batch log files | `bulk<secs>_<n>.log`, one line per command |
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use bulk_sinks::{StreamSink, Transform};
//!
//! let sink = StreamSink::stdout("console", Transform::Factorial);
//! manager.subscribe(Arc::new(sink), &PoolConfig::new("console", 2))?;
//! ```

// =============================================================================
// Sink implementations (each in its own submodule)
// =============================================================================

/// Null sink - discards all data (for benchmarking)
pub mod null;

/// Stream sink - one line per batch to any writer
pub mod stream;

/// File sink - one file per batch
pub mod file;

// =============================================================================
// Shared types
// =============================================================================

/// Metrics shared by all sinks
mod common;

/// Payload transforms
mod transform;

// =============================================================================
// Public re-exports
// =============================================================================

pub use common::{MetricsSnapshot, SinkMetrics};
pub use transform::{Transform, TransformError};

pub use file::FileSink;
pub use null::NullSink;
pub use stream::StreamSink;
