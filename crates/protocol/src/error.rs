//! Protocol error types
//!
//! Errors that can occur while reading commands from a source.

use thiserror::Error;

/// Errors that can occur during protocol operations
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Reading from the underlying stream failed
    #[error("failed to read command: {0}")]
    Io(#[from] std::io::Error),
}
