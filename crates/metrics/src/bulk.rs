//! Global structural metrics
//!
//! Counts what the producer has seen. Not thread-safe on purpose: the batch
//! manager is the only writer and it runs on the producer thread.

use std::fmt;

use serde::Serialize;

/// Global tally of lines, data commands and flushed blocks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BulkMetrics {
    /// Every non-terminator command, structural ones included
    pub lines: u64,
    /// Data commands only
    pub commands: u64,
    /// Batches actually dispatched to sinks
    pub blocks: u64,
}

impl BulkMetrics {
    /// Create a zeroed tally
    #[inline]
    pub const fn new() -> Self {
        Self {
            lines: 0,
            commands: 0,
            blocks: 0,
        }
    }

    /// Record one input line
    #[inline]
    pub fn record_line(&mut self) {
        self.lines += 1;
    }

    /// Record one data command
    #[inline]
    pub fn record_command(&mut self) {
        self.commands += 1;
    }

    /// Record one dispatched block
    #[inline]
    pub fn record_block(&mut self) {
        self.blocks += 1;
    }
}

impl fmt::Display for BulkMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lines, {} commands, {} blocks",
            self.lines, self.commands, self.blocks
        )
    }
}
