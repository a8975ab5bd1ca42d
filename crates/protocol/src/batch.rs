//! Batch - Immutable group of data commands
//!
//! The `Batch` struct is the core data type that flows from the manager to the
//! sinks. It is produced by `BatchBuilder::seal()` and has no mutating methods,
//! so it can be shared as `Arc<Batch>` across worker threads without locks.

use chrono::{DateTime, Utc};

/// Sealed, immutable batch of data commands
///
/// # Invariants
///
/// - Never empty: `BatchBuilder::seal()` returns `None` instead of an empty batch
/// - Never mutated after sealing
/// - `sequence` increases by one per sealed batch of the same builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Position of this batch in the producer's output order
    sequence: u64,

    /// When the first command of this batch was appended
    created_at: DateTime<Utc>,

    /// Data payloads in arrival order
    commands: Vec<String>,
}

impl Batch {
    /// Get the batch sequence number
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Get the creation timestamp
    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Get the number of commands in this batch
    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Always false for a sealed batch; provided for API symmetry
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Get a command payload by index
    #[inline]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.commands.get(index).map(String::as_str)
    }

    /// Iterate over command payloads in order
    #[inline]
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(String::as_str)
    }

    /// Get the payloads as a slice
    #[inline]
    pub fn as_slice(&self) -> &[String] {
        &self.commands
    }
}

/// Builder for accumulating commands into a batch
///
/// Owned exclusively by the producer thread. Reused across flushes: `seal()`
/// hands out the accumulated commands and leaves the builder empty.
#[derive(Debug, Default)]
pub struct BatchBuilder {
    /// Accumulated payloads
    commands: Vec<String>,

    /// Timestamp of the first appended command
    started_at: Option<DateTime<Utc>>,

    /// Sequence number for the next sealed batch
    next_sequence: u64,
}

impl BatchBuilder {
    /// Create a new, empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with room for `capacity` commands
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Append a payload
    ///
    /// Returns the number of commands now held.
    pub fn push(&mut self, payload: impl Into<String>) -> usize {
        if self.commands.is_empty() {
            self.started_at = Some(Utc::now());
        }
        self.commands.push(payload.into());
        self.commands.len()
    }

    /// Get the current command count
    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if nothing has been appended since the last seal
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Seal the accumulated commands into an immutable `Batch`
    ///
    /// Returns `None` (and consumes no sequence number) if the builder is
    /// empty. The builder is empty again afterwards.
    pub fn seal(&mut self) -> Option<Batch> {
        if self.commands.is_empty() {
            return None;
        }

        let capacity = self.commands.capacity();
        let commands = std::mem::replace(&mut self.commands, Vec::with_capacity(capacity));
        let created_at = self.started_at.take().unwrap_or_else(Utc::now);
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        Some(Batch {
            sequence,
            created_at,
            commands,
        })
    }

    /// Drop the accumulated commands without sealing
    ///
    /// Returns how many commands were discarded.
    pub fn discard(&mut self) -> usize {
        let dropped = self.commands.len();
        self.commands.clear();
        self.started_at = None;
        dropped
    }
}
