//! Bulk - Pipeline
//!
//! Groups a stream of commands into batches and fans each sealed batch out to
//! subscribed sinks through named worker pools.
//!
//! # Architecture
//!
//! ```text
//! [CommandSource]          [BulkManager]                         [Lanes]
//!    LineReader ──→ submit() ──→ Grouper ──→ Arc<Batch> ──┬──→ WorkerPool "console" ──→ StreamSink
//!                               (depth)                   └──→ WorkerPool "file"    ──→ FileSink
//! ```
//!
//! # Key Design
//!
//! - **Single producer**: `BulkManager::submit` takes `&mut self`; the open
//!   batch and grouping depth need no locks
//! - **Arc fan-out**: Sealed batches are immutable and shared by every sink task
//! - **Lanes**: One worker pool per sink category isolates slow sinks and gives
//!   per-category throughput metrics
//! - **Contained failures**: A sink error or panic is logged and counted by the
//!   worker that ran it, never propagated to the producer
//! - **Drain on shutdown**: Every dispatched task runs before pools report
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use bulk_pipeline::{BulkManager, PoolConfig, drive};
//! use bulk_protocol::LineReader;
//!
//! let mut manager = BulkManager::new(3)?;
//! manager.subscribe(Arc::new(my_sink), &PoolConfig::new("console", 2))?;
//!
//! let mut reader = LineReader::new(std::io::stdin().lock());
//! drive(&mut reader, &mut manager)?;
//!
//! let report = manager.shutdown();
//! ```

mod driver;
mod error;
mod grouping;
mod lane;
mod manager;
mod pool;
mod sink;

pub use driver::drive;
pub use error::{PipelineError, Result};
pub use grouping::{Grouper, UnterminatedBlock};
pub use lane::{LaneId, SubscriptionId};
pub use manager::{BulkManager, ManagerReport, PoolConfig};
pub use pool::{TaskHandle, TaskResult, WorkerPool};
pub use sink::{Sink, SinkError};

// Re-export key types from dependencies for convenience
pub use bulk_metrics::{BulkMetrics, PoolReport, WorkerMetrics};
pub use bulk_protocol::{Batch, Command, CommandKind};

/// Default number of worker threads per lane
pub const DEFAULT_WORKERS: usize = 2;

#[cfg(test)]
mod test_utils;

#[cfg(test)]
mod grouping_test;
#[cfg(test)]
mod manager_test;
