//! Worker pool
//!
//! A named, fixed-size set of OS threads draining a shared FIFO queue.
//!
//! # Design
//!
//! - Queue is a `parking_lot::Mutex<VecDeque>` plus `Condvar`; the lock is
//!   released before a task runs
//! - Each worker keeps its `WorkerMetrics` on its own stack and returns it
//!   through its `JoinHandle`, so tallies need no synchronization
//! - Task errors and panics are caught, logged and counted; a worker never dies
//!   because of a task
//! - `shutdown` drains the queue, joins every worker and reports exactly once

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use bulk_metrics::{PoolReport, WorkerMetrics};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use parking_lot::{Condvar, Mutex};

use crate::error::{PipelineError, Result};
use crate::sink::SinkError;

/// Outcome of a task: units processed, or the failure
pub type TaskResult = std::result::Result<usize, SinkError>;

type Task = Box<dyn FnOnce() -> TaskResult + Send + 'static>;

struct Job {
    task: Task,
    done: Sender<TaskResult>,
}

struct State {
    tasks: VecDeque<Job>,
    quit: bool,
    submitted: u64,
}

struct Shared {
    state: Mutex<State>,
    available: Condvar,
}

/// Handle to a submitted task's outcome
///
/// Dropping the handle does not cancel the task.
#[derive(Debug)]
pub struct TaskHandle {
    outcome: Receiver<TaskResult>,
}

impl TaskHandle {
    /// Block until the task has run
    ///
    /// Returns `None` only if the task was dropped without running.
    pub fn wait(self) -> Option<TaskResult> {
        self.outcome.recv().ok()
    }

    /// Wait up to `timeout` for the task to finish
    ///
    /// Gives the handle back on timeout so the caller can keep waiting.
    pub fn wait_timeout(self, timeout: Duration) -> std::result::Result<Option<TaskResult>, Self> {
        match self.outcome.recv_timeout(timeout) {
            Ok(outcome) => Ok(Some(outcome)),
            Err(RecvTimeoutError::Disconnected) => Ok(None),
            Err(RecvTimeoutError::Timeout) => Err(self),
        }
    }

    /// Check whether the task has finished without blocking
    pub fn is_finished(&self) -> bool {
        !self.outcome.is_empty()
    }
}

/// Fixed-size pool of named worker threads
pub struct WorkerPool {
    name: String,
    workers: usize,
    shared: Arc<Shared>,
    handles: Mutex<Vec<JoinHandle<WorkerMetrics>>>,
}

impl WorkerPool {
    /// Start a pool with `workers` threads named `<name>-<index>`
    pub fn new(name: impl Into<String>, workers: usize) -> Result<Self> {
        let name = name.into();
        if workers == 0 {
            return Err(PipelineError::InvalidWorkerCount { pool: name });
        }

        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                tasks: VecDeque::new(),
                quit: false,
                submitted: 0,
            }),
            available: Condvar::new(),
        });

        let pool = Self {
            name,
            workers,
            shared,
            handles: Mutex::new(Vec::with_capacity(workers)),
        };

        for index in 0..workers {
            let shared = Arc::clone(&pool.shared);
            let pool_name = pool.name.clone();
            let handle = thread::Builder::new()
                .name(format!("{}-{}", pool.name, index))
                .spawn(move || worker_loop(&pool_name, index, &shared))
                .map_err(|source| PipelineError::Spawn {
                    pool: pool.name.clone(),
                    worker: index,
                    source,
                })?;
            pool.handles.lock().push(handle);
        }

        tracing::debug!(pool = %pool.name, workers, "worker pool started");
        Ok(pool)
    }

    /// Enqueue a task
    ///
    /// Fails with `PoolClosed` once shutdown has begun.
    pub fn submit<F>(&self, task: F) -> Result<TaskHandle>
    where
        F: FnOnce() -> TaskResult + Send + 'static,
    {
        let (done, outcome) = crossbeam_channel::bounded(1);
        {
            let mut state = self.shared.state.lock();
            if state.quit {
                return Err(PipelineError::pool_closed(&self.name));
            }
            state.tasks.push_back(Job {
                task: Box::new(task),
                done,
            });
            state.submitted += 1;
        }
        self.shared.available.notify_one();

        Ok(TaskHandle { outcome })
    }

    /// Stop accepting tasks, drain the queue and join every worker
    ///
    /// Returns the pool report on the first call and `None` afterwards.
    pub fn shutdown(&self) -> Option<PoolReport> {
        let submitted = {
            let mut state = self.shared.state.lock();
            if state.quit {
                return None;
            }
            state.quit = true;
            state.submitted
        };
        self.shared.available.notify_all();

        let handles = std::mem::take(&mut *self.handles.lock());
        let mut workers = Vec::with_capacity(handles.len());
        for (index, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(metrics) => workers.push(metrics),
                Err(_) => {
                    tracing::error!(pool = %self.name, worker = index, "worker thread panicked");
                    workers.push(WorkerMetrics::new(index));
                }
            }
        }

        let report = PoolReport::new(self.name.clone(), submitted, workers);
        for worker in &report.workers {
            tracing::info!(
                pool = %report.pool,
                worker = worker.worker,
                blocks = worker.blocks,
                commands = worker.commands,
                failures = worker.failures,
                "worker finished"
            );
        }
        tracing::debug!(pool = %self.name, submitted, "worker pool stopped");

        Some(report)
    }

    /// Pool name
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of worker threads
    #[inline]
    pub fn worker_count(&self) -> usize {
        self.workers
    }

    /// Tasks waiting in the queue
    pub fn pending(&self) -> usize {
        self.shared.state.lock().tasks.len()
    }

    /// Tasks accepted so far
    pub fn submitted(&self) -> u64 {
        self.shared.state.lock().submitted
    }

    /// Whether shutdown has begun
    pub fn is_closed(&self) -> bool {
        self.shared.state.lock().quit
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("name", &self.name)
            .field("workers", &self.workers)
            .field("closed", &self.is_closed())
            .finish()
    }
}

fn worker_loop(pool: &str, index: usize, shared: &Shared) -> WorkerMetrics {
    let mut metrics = WorkerMetrics::new(index);

    loop {
        let job = {
            let mut state = shared.state.lock();
            while state.tasks.is_empty() && !state.quit {
                shared.available.wait(&mut state);
            }
            match state.tasks.pop_front() {
                Some(job) => job,
                // quit and drained
                None => break,
            }
        };

        let outcome = run_task(job.task);
        match &outcome {
            Ok(units) => metrics.record_task(*units as u64),
            Err(e) => {
                metrics.record_failure();
                tracing::warn!(pool, worker = index, error = %e, "task failed");
            }
        }
        // Receiver may have been dropped
        let _ = job.done.send(outcome);
    }

    metrics
}

fn run_task(task: Task) -> TaskResult {
    panic::catch_unwind(AssertUnwindSafe(task))
        .unwrap_or_else(|payload| Err(SinkError::Panicked(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
