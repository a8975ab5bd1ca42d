//! File sink - one file per batch
//!
//! Writes every batch to its own file in the output directory:
//!
//! ```text
//! bulk1718035200_0.log
//! bulk1718035200_1.log
//! ```
//!
//! The name combines the batch creation time (unix seconds) with a
//! process-wide counter, so batches sealed within the same second never
//! collide, even across file sinks sharing a directory. Each command is
//! rendered through the configured `Transform` on its own line.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use bulk_pipeline::{Batch, Sink, SinkError};

use crate::common::{MetricsSnapshot, SinkMetrics};
use crate::transform::Transform;

/// File name sequence shared by every `FileSink` in the process
static FILE_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Sink writing each batch to a separate file
#[derive(Debug)]
pub struct FileSink {
    name: String,
    dir: PathBuf,
    transform: Transform,
    metrics: SinkMetrics,
}

impl FileSink {
    /// Create a sink writing into `dir`
    ///
    /// The directory is created on the first write if missing.
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>, transform: Transform) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            transform,
            metrics: SinkMetrics::new(),
        }
    }

    /// Output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Get a snapshot of the sink metrics
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Reserve the next file path for a batch
    fn next_path(&self, batch: &Batch) -> PathBuf {
        let counter = FILE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        self.dir.join(format!(
            "bulk{}_{}.log",
            batch.created_at().timestamp(),
            counter
        ))
    }

    fn write_batch(&self, path: &Path, batch: &Batch) -> std::io::Result<()> {
        if !self.dir.as_os_str().is_empty() {
            fs::create_dir_all(&self.dir)?;
        }

        let mut out = BufWriter::new(File::create(path)?);
        for payload in batch.commands() {
            writeln!(out, "{}", self.transform.render(payload))?;
        }
        out.flush()
    }
}

impl Sink for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&self, batch: &Batch) -> Result<usize, SinkError> {
        let path = self.next_path(batch);

        match self.write_batch(&path, batch) {
            Ok(()) => {
                tracing::trace!(sink = %self.name, path = %path.display(), size = batch.len(), "batch written");
                self.metrics.batch_written(batch.len() as u64);
                Ok(batch.len())
            }
            Err(e) => {
                self.metrics.write_error();
                Err(SinkError::write(format!(
                    "cannot create file {}: {}",
                    path.display(),
                    e
                )))
            }
        }
    }
}
