//! Stream sink - one line per batch
//!
//! Writes each batch as a single line to any `Write`:
//!
//! ```text
//! bulk: cmd1, cmd2, cmd3
//! bulk: 1, 2, 6
//! ```
//!
//! Each payload is rendered through the configured `Transform`. The writer is
//! locked for the whole line, so concurrent workers never interleave output
//! within a line.

use std::io::{self, Stdout, Write};

use bulk_pipeline::{Batch, Sink, SinkError};
use parking_lot::Mutex;

use crate::common::{MetricsSnapshot, SinkMetrics};
use crate::transform::Transform;

/// Prefix of every output line
pub const LINE_PREFIX: &str = "bulk: ";

/// Sink writing one line per batch
pub struct StreamSink<W> {
    name: String,
    transform: Transform,
    writer: Mutex<W>,
    metrics: SinkMetrics,
}

impl StreamSink<Stdout> {
    /// Create a sink writing to the process stdout
    pub fn stdout(name: impl Into<String>, transform: Transform) -> Self {
        Self::with_writer(name, transform, io::stdout())
    }
}

impl<W: Write + Send> StreamSink<W> {
    /// Create a sink writing to `writer`
    pub fn with_writer(name: impl Into<String>, transform: Transform, writer: W) -> Self {
        Self {
            name: name.into(),
            transform,
            writer: Mutex::new(writer),
            metrics: SinkMetrics::new(),
        }
    }

    /// Render a batch as one output line (with trailing newline)
    pub fn format_line(&self, batch: &Batch) -> String {
        let rendered: Vec<String> = batch
            .commands()
            .map(|payload| self.transform.render(payload))
            .collect();
        format!("{LINE_PREFIX}{}\n", rendered.join(", "))
    }

    /// Get a snapshot of the sink metrics
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Consume the sink and return the writer
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> Sink for StreamSink<W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&self, batch: &Batch) -> Result<usize, SinkError> {
        let line = self.format_line(batch);

        let result = {
            let mut writer = self.writer.lock();
            writer
                .write_all(line.as_bytes())
                .and_then(|()| writer.flush())
        };

        match result {
            Ok(()) => {
                self.metrics.batch_written(batch.len() as u64);
                Ok(batch.len())
            }
            Err(e) => {
                self.metrics.write_error();
                Err(SinkError::Io(e))
            }
        }
    }
}

impl<W> std::fmt::Debug for StreamSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamSink")
            .field("name", &self.name)
            .field("transform", &self.transform)
            .finish()
    }
}
