//! Batch manager
//!
//! Single entry point for commands. Owns the grouping state machine, the
//! global tally and the worker pool lanes, and fans every sealed batch out to
//! all subscribed sinks.

use std::collections::HashMap;
use std::sync::Arc;

use bulk_metrics::{BulkMetrics, PoolReport};
use bulk_protocol::{Batch, Command, CommandKind};

use crate::DEFAULT_WORKERS;
use crate::error::{PipelineError, Result};
use crate::grouping::{Grouper, UnterminatedBlock};
use crate::lane::{LaneId, SubscriptionId};
use crate::pool::WorkerPool;
use crate::sink::Sink;

/// Lane settings used when subscribing a sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Lane name, also the worker thread name prefix
    pub name: String,
    /// Worker threads in the lane
    pub workers: usize,
}

impl PoolConfig {
    /// Create a lane config
    pub fn new(name: impl Into<String>, workers: usize) -> Self {
        Self {
            name: name.into(),
            workers,
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new("default", DEFAULT_WORKERS)
    }
}

/// Final state of a manager after shutdown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagerReport {
    /// Global tally
    pub metrics: BulkMetrics,
    /// One report per lane, in creation order
    pub pools: Vec<PoolReport>,
}

struct Lane {
    pool: WorkerPool,
}

struct Subscription {
    id: SubscriptionId,
    sink: Arc<dyn Sink>,
    lane: LaneId,
}

/// Batching engine with fan-out to subscribed sinks
///
/// # Example
///
/// ```ignore
/// let mut manager = BulkManager::new(3)?;
/// manager.subscribe(Arc::new(sink), &PoolConfig::new("console", 2))?;
/// manager.submit(Command::data("cmd1"))?;
/// manager.submit(Command::terminator())?;
/// let report = manager.shutdown();
/// ```
pub struct BulkManager {
    grouper: Grouper,
    metrics: BulkMetrics,
    lanes: Vec<Lane>,
    lane_names: HashMap<String, LaneId>,
    subscriptions: Vec<Subscription>,
}

impl BulkManager {
    /// Create a manager cutting batches every `capacity` commands
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_policy(capacity, UnterminatedBlock::default())
    }

    /// Create a manager with an explicit unterminated-block policy
    pub fn with_policy(capacity: usize, policy: UnterminatedBlock) -> Result<Self> {
        Ok(Self {
            grouper: Grouper::with_policy(capacity, policy)?,
            metrics: BulkMetrics::new(),
            lanes: Vec::new(),
            lane_names: HashMap::new(),
            subscriptions: Vec::new(),
        })
    }

    /// Bind a sink to a lane, starting the lane on first use
    ///
    /// An existing lane is reused by name; its worker count does not change.
    pub fn subscribe(&mut self, sink: Arc<dyn Sink>, pool: &PoolConfig) -> Result<SubscriptionId> {
        let lane = match self.lane_names.get(&pool.name) {
            Some(&lane) => {
                let existing = self.lanes[lane.as_usize()].pool.worker_count();
                if existing != pool.workers {
                    tracing::warn!(
                        pool = %pool.name,
                        existing,
                        requested = pool.workers,
                        "lane already running, ignoring worker count"
                    );
                }
                lane
            }
            None => self.add_lane(pool)?,
        };

        let id = SubscriptionId::new(self.subscriptions.len() as u32);
        tracing::debug!(sink = sink.name(), pool = %pool.name, %lane, "sink subscribed");
        self.subscriptions.push(Subscription { id, sink, lane });
        Ok(id)
    }

    fn add_lane(&mut self, config: &PoolConfig) -> Result<LaneId> {
        if self.lanes.len() >= LaneId::MAX as usize {
            return Err(PipelineError::TooManyLanes {
                max: LaneId::MAX as usize,
            });
        }

        let id = LaneId::new(self.lanes.len() as u16);
        let pool = WorkerPool::new(config.name.clone(), config.workers)?;
        self.lanes.push(Lane { pool });
        self.lane_names.insert(config.name.clone(), id);
        Ok(id)
    }

    /// Feed one command into the engine
    ///
    /// Updates the global tally, advances the state machine and dispatches any
    /// sealed batch. Fails with `Terminated` after the terminator.
    pub fn submit(&mut self, command: Command) -> Result<()> {
        if self.grouper.is_terminated() {
            return Err(PipelineError::Terminated);
        }

        match command.kind() {
            CommandKind::Data => {
                self.metrics.record_line();
                self.metrics.record_command();
            }
            CommandKind::BlockOpen | CommandKind::BlockClose => self.metrics.record_line(),
            CommandKind::Terminator => {}
        }

        if let Some(batch) = self.grouper.accept(command)? {
            self.dispatch(batch)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, batch: Batch) -> Result<()> {
        self.metrics.record_block();

        if self.subscriptions.is_empty() {
            tracing::trace!(sequence = batch.sequence(), "no subscribers, batch dropped");
            return Ok(());
        }

        tracing::trace!(
            sequence = batch.sequence(),
            size = batch.len(),
            sinks = self.subscriptions.len(),
            "dispatching batch"
        );

        let batch = Arc::new(batch);
        let mut first_error = None;
        for subscription in &self.subscriptions {
            let sink = Arc::clone(&subscription.sink);
            let shared = Arc::clone(&batch);
            let pool = &self.lanes[subscription.lane.as_usize()].pool;

            if let Err(e) = pool.submit(move || sink.update(&shared)) {
                tracing::error!(
                    subscription = %subscription.id,
                    sink = subscription.sink.name(),
                    pool = pool.name(),
                    error = %e,
                    "failed to dispatch batch"
                );
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    /// Snapshot of the global tally
    pub fn report_metrics(&self) -> BulkMetrics {
        self.metrics
    }

    /// Current block nesting depth
    pub fn depth(&self) -> usize {
        self.grouper.depth()
    }

    /// Whether the terminator has been submitted
    pub fn is_terminated(&self) -> bool {
        self.grouper.is_terminated()
    }

    /// Number of running lanes
    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Number of subscribed sinks
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Drain and join every lane
    pub fn shutdown(mut self) -> ManagerReport {
        let pools = self.shutdown_lanes();
        ManagerReport {
            metrics: self.metrics,
            pools,
        }
    }

    fn shutdown_lanes(&mut self) -> Vec<PoolReport> {
        if !self.grouper.is_terminated() && self.grouper.pending() > 0 {
            tracing::warn!(
                pending = self.grouper.pending(),
                depth = self.grouper.depth(),
                "shutting down before terminator, pending commands dropped"
            );
        }

        self.lanes
            .iter()
            .filter_map(|lane| lane.pool.shutdown())
            .collect()
    }
}

impl Drop for BulkManager {
    fn drop(&mut self) {
        self.shutdown_lanes();
    }
}

impl std::fmt::Debug for BulkManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BulkManager")
            .field("grouper", &self.grouper)
            .field("metrics", &self.metrics)
            .field("lanes", &self.lanes.len())
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}
