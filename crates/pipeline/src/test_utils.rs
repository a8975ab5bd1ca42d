//! Test sinks shared by the pipeline tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bulk_protocol::{Batch, Command};
use parking_lot::Mutex;

use crate::{Sink, SinkError};

/// Records every batch it receives
#[derive(Debug, Default)]
pub struct RecordingSink {
    name: String,
    batches: Mutex<Vec<(u64, Vec<String>)>>,
    delay: Option<Duration>,
}

impl RecordingSink {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_delay(name: &str, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new(name)
        }
    }

    /// Batches in sequence order
    pub fn batches(&self) -> Vec<Vec<String>> {
        let mut batches = self.batches.lock().clone();
        batches.sort_by_key(|(sequence, _)| *sequence);
        batches.into_iter().map(|(_, commands)| commands).collect()
    }

    /// Batches in the order `update` was called
    pub fn arrival_order(&self) -> Vec<u64> {
        self.batches.lock().iter().map(|(seq, _)| *seq).collect()
    }
}

impl Sink for RecordingSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&self, batch: &Batch) -> Result<usize, SinkError> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.batches
            .lock()
            .push((batch.sequence(), batch.as_slice().to_vec()));
        Ok(batch.len())
    }
}

/// Fails every batch, either with an error or a panic
#[derive(Debug)]
pub struct FailingSink {
    panic: bool,
    calls: AtomicUsize,
}

impl FailingSink {
    pub fn erroring() -> Self {
        Self {
            panic: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn panicking() -> Self {
        Self {
            panic: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Sink for FailingSink {
    fn name(&self) -> &str {
        "failing"
    }

    fn update(&self, _batch: &Batch) -> Result<usize, SinkError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.panic {
            panic!("sink exploded");
        }
        Err(SinkError::write("disk full"))
    }
}

/// Classify lines into commands
pub fn commands(lines: &[&str]) -> Vec<Command> {
    lines.iter().map(|l| Command::parse_line(l)).collect()
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
