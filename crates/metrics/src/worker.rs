//! Per-worker metrics and pool reports
//!
//! A `WorkerMetrics` lives on its worker thread's stack and is returned through
//! the thread's join handle, so it is never read while the worker runs.

use std::fmt;

use serde::Serialize;

/// Throughput tally for a single worker thread
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WorkerMetrics {
    /// Worker index within its pool
    pub worker: usize,
    /// Units reported by completed tasks (commands processed)
    pub commands: u64,
    /// Tasks that ran to completion without error
    pub blocks: u64,
    /// Tasks that returned an error or panicked
    pub failures: u64,
}

impl WorkerMetrics {
    /// Create a zeroed tally for the given worker index
    #[inline]
    pub const fn new(worker: usize) -> Self {
        Self {
            worker,
            commands: 0,
            blocks: 0,
            failures: 0,
        }
    }

    /// Record a completed task and the units it reported
    #[inline]
    pub fn record_task(&mut self, units: u64) {
        self.commands += units;
        self.blocks += 1;
    }

    /// Record a failed task
    #[inline]
    pub fn record_failure(&mut self) {
        self.failures += 1;
    }

    /// Tasks this worker executed, successful or not
    #[inline]
    pub fn tasks_executed(&self) -> u64 {
        self.blocks + self.failures
    }
}

impl fmt::Display for WorkerMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} blocks, {} commands", self.blocks, self.commands)?;
        if self.failures > 0 {
            write!(f, ", {} failures", self.failures)?;
        }
        Ok(())
    }
}

/// Final metrics of a worker pool, produced once at shutdown
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PoolReport {
    /// Pool (lane) name
    pub pool: String,
    /// Tasks accepted by `submit`
    pub submitted: u64,
    /// One entry per worker, ordered by worker index
    pub workers: Vec<WorkerMetrics>,
}

impl PoolReport {
    /// Create a report from collected worker tallies
    pub fn new(pool: impl Into<String>, submitted: u64, mut workers: Vec<WorkerMetrics>) -> Self {
        workers.sort_by_key(|w| w.worker);
        Self {
            pool: pool.into(),
            submitted,
            workers,
        }
    }

    /// Number of workers in the pool
    #[inline]
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Sum of commands over all workers
    pub fn total_commands(&self) -> u64 {
        self.workers.iter().map(|w| w.commands).sum()
    }

    /// Sum of completed blocks over all workers
    pub fn total_blocks(&self) -> u64 {
        self.workers.iter().map(|w| w.blocks).sum()
    }

    /// Sum of failed tasks over all workers
    pub fn total_failures(&self) -> u64 {
        self.workers.iter().map(|w| w.failures).sum()
    }
}

impl fmt::Display for PoolReport {
    /// One line per worker: `<pool>: <blocks> blocks, <commands> commands`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, worker) in self.workers.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", self.pool, worker)?;
        }
        Ok(())
    }
}
