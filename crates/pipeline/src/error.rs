//! Pipeline error types
//!
//! Errors for lifecycle misuse of pools and the batch manager. Sink failures
//! are not pipeline errors; workers contain them.

use thiserror::Error;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Task submitted to a pool that has begun shutting down
    #[error("pool closed: {pool}")]
    PoolClosed {
        /// Name of the closed pool
        pool: String,
    },

    /// Command submitted after the terminator
    #[error("command stream already terminated")]
    Terminated,

    /// Batch capacity of zero
    #[error("batch capacity must be at least 1")]
    InvalidCapacity,

    /// Pool configured without workers
    #[error("pool '{pool}' needs at least one worker")]
    InvalidWorkerCount {
        /// Name of the misconfigured pool
        pool: String,
    },

    /// More lanes than `LaneId` can address
    #[error("too many lanes (max {max})")]
    TooManyLanes {
        /// Maximum number of lanes
        max: usize,
    },

    /// The OS refused to start a worker thread
    #[error("failed to spawn worker {worker} for pool '{pool}': {source}")]
    Spawn {
        /// Name of the pool
        pool: String,
        /// Worker index
        worker: usize,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Create a pool closed error
    #[inline]
    pub fn pool_closed(pool: impl Into<String>) -> Self {
        Self::PoolClosed { pool: pool.into() }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PipelineError::pool_closed("console");
        assert!(err.to_string().contains("pool closed: console"));

        let err = PipelineError::Terminated;
        assert!(err.to_string().contains("terminated"));

        let err = PipelineError::InvalidCapacity;
        assert!(err.to_string().contains("at least 1"));

        let err = PipelineError::InvalidWorkerCount {
            pool: "file".into(),
        };
        assert!(err.to_string().contains("'file'"));

        let err = PipelineError::Spawn {
            pool: "file".into(),
            worker: 3,
            source: std::io::Error::other("no threads"),
        };
        assert!(err.to_string().contains("worker 3"));
        assert!(err.to_string().contains("no threads"));
    }
}
