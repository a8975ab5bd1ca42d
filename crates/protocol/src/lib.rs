//! Bulk Protocol - Core types for the bulk pipeline
//!
//! This crate provides the foundational types that flow through the pipeline:
//! - `Command` / `CommandKind` - A single classified input line
//! - `Batch` - A sealed, immutable group of data commands
//! - `BatchBuilder` - The producer-owned accumulator that seals batches
//! - `CommandSource` / `LineReader` - Where commands come from
//!
//! # Design Principles
//!
//! - **Immutable once sealed**: A `Batch` has no mutating methods
//! - **Arc-friendly**: Batches are wrapped in `Arc` for multi-sink fan-out
//! - **End of stream is a value**: Sources report EOF and read errors as a
//!   `Terminator` command, never as an error

mod batch;
mod command;
mod error;
mod source;

pub use batch::{Batch, BatchBuilder};
pub use command::{BLOCK_CLOSE_TOKEN, BLOCK_OPEN_TOKEN, Command, CommandKind};
pub use error::ProtocolError;
pub use source::{CommandSource, LineReader, VecSource};

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;
