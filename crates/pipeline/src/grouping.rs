//! Batch grouping state machine
//!
//! Decides when the open batch is sealed. Outside explicit blocks, batches are
//! cut every `capacity` data commands. Inside a block (depth > 0) size-based
//! cutting is suspended; the batch is sealed when the outermost block closes.
//!
//! | State    | Command    | Effect                                            |
//! |----------|------------|---------------------------------------------------|
//! | Normal   | Data       | append; seal when the batch reaches capacity      |
//! | Normal   | BlockOpen  | seal pending commands; depth = 1                  |
//! | Grouping | BlockOpen  | depth += 1                                        |
//! | Grouping | Data       | append                                            |
//! | Grouping | BlockClose | depth -= 1; seal at depth 0                       |
//! | Any      | Terminator | seal pending commands (or discard, see policy)    |

use std::fmt;

use bulk_protocol::{Batch, BatchBuilder, Command, CommandKind};

use crate::error::{PipelineError, Result};

/// What a terminator does with a block that was never closed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnterminatedBlock {
    /// Seal the block contents as a batch
    #[default]
    Flush,
    /// Drop the block contents
    Discard,
}

impl UnterminatedBlock {
    /// Get the policy as a static string
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flush => "flush",
            Self::Discard => "discard",
        }
    }
}

impl fmt::Display for UnterminatedBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nesting-aware batch state machine
///
/// Owned by the single producer. `accept` returns the batch sealed by the
/// command, if any; a sealed batch is never empty.
#[derive(Debug)]
pub struct Grouper {
    capacity: usize,
    depth: usize,
    builder: BatchBuilder,
    policy: UnterminatedBlock,
    terminated: bool,
}

impl Grouper {
    /// Create a grouper that cuts batches every `capacity` commands
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_policy(capacity, UnterminatedBlock::default())
    }

    /// Create a grouper with an explicit unterminated-block policy
    pub fn with_policy(capacity: usize, policy: UnterminatedBlock) -> Result<Self> {
        if capacity == 0 {
            return Err(PipelineError::InvalidCapacity);
        }

        Ok(Self {
            capacity,
            depth: 0,
            builder: BatchBuilder::with_capacity(capacity),
            policy,
            terminated: false,
        })
    }

    /// Feed one command through the state machine
    ///
    /// Returns `Err(Terminated)` for any command after the terminator.
    pub fn accept(&mut self, command: Command) -> Result<Option<Batch>> {
        if self.terminated {
            return Err(PipelineError::Terminated);
        }

        let sealed = match command.kind() {
            CommandKind::Data => {
                let len = self.builder.push(command.into_payload().unwrap_or_default());
                if self.depth == 0 && len >= self.capacity {
                    self.builder.seal()
                } else {
                    None
                }
            }
            CommandKind::BlockOpen => {
                self.depth += 1;
                if self.depth == 1 {
                    self.builder.seal()
                } else {
                    None
                }
            }
            CommandKind::BlockClose => match self.depth {
                0 => {
                    tracing::debug!("block close outside of a block ignored");
                    None
                }
                1 => {
                    self.depth = 0;
                    self.builder.seal()
                }
                _ => {
                    self.depth -= 1;
                    None
                }
            },
            CommandKind::Terminator => self.terminate(),
        };

        Ok(sealed)
    }

    fn terminate(&mut self) -> Option<Batch> {
        self.terminated = true;

        if self.depth == 0 {
            return self.builder.seal();
        }

        let depth = std::mem::take(&mut self.depth);
        match self.policy {
            UnterminatedBlock::Flush => {
                tracing::debug!(
                    depth,
                    size = self.builder.len(),
                    "stream ended inside a block, flushing"
                );
                self.builder.seal()
            }
            UnterminatedBlock::Discard => {
                let dropped = self.builder.discard();
                tracing::debug!(depth, dropped, "stream ended inside a block, discarding");
                None
            }
        }
    }

    /// Batch size limit outside blocks
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current block nesting depth
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Whether the grouper is inside an explicit block
    #[inline]
    pub fn is_grouping(&self) -> bool {
        self.depth > 0
    }

    /// Commands appended since the last seal
    #[inline]
    pub fn pending(&self) -> usize {
        self.builder.len()
    }

    /// Whether the terminator has been accepted
    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Policy applied to a block left open at the terminator
    #[inline]
    pub fn policy(&self) -> UnterminatedBlock {
        self.policy
    }
}
