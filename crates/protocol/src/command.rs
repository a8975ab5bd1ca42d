//! Command types
//!
//! A `Command` is one classified input line. Only the exact lines `{` and `}`
//! are structural; everything else (including `cmd{`, blank lines and lines
//! with spaces) is data.

use std::fmt;

/// Line that opens an explicit block
pub const BLOCK_OPEN_TOKEN: &str = "{";

/// Line that closes an explicit block
pub const BLOCK_CLOSE_TOKEN: &str = "}";

/// Classification of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Regular command carrying a payload
    Data,
    /// Start of an explicit (possibly nested) block
    BlockOpen,
    /// End of an explicit block
    BlockClose,
    /// End of the command stream
    Terminator,
}

impl CommandKind {
    /// Get the kind as a static string (for logging)
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::BlockOpen => "block_open",
            Self::BlockClose => "block_close",
            Self::Terminator => "terminator",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single command produced by a `CommandSource`
///
/// Immutable once created. Only `Data` commands carry a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    kind: CommandKind,
    payload: Option<String>,
}

impl Command {
    /// Create a data command
    #[inline]
    pub fn data(payload: impl Into<String>) -> Self {
        Self {
            kind: CommandKind::Data,
            payload: Some(payload.into()),
        }
    }

    /// Create a block open command
    #[inline]
    pub const fn block_open() -> Self {
        Self {
            kind: CommandKind::BlockOpen,
            payload: None,
        }
    }

    /// Create a block close command
    #[inline]
    pub const fn block_close() -> Self {
        Self {
            kind: CommandKind::BlockClose,
            payload: None,
        }
    }

    /// Create a terminator command
    #[inline]
    pub const fn terminator() -> Self {
        Self {
            kind: CommandKind::Terminator,
            payload: None,
        }
    }

    /// Classify a raw line (without its line ending)
    ///
    /// # Example
    ///
    /// ```
    /// use bulk_protocol::{Command, CommandKind};
    ///
    /// assert_eq!(Command::parse_line("{").kind(), CommandKind::BlockOpen);
    /// assert_eq!(Command::parse_line("cmd{").kind(), CommandKind::Data);
    /// ```
    pub fn parse_line(line: &str) -> Self {
        match line {
            BLOCK_OPEN_TOKEN => Self::block_open(),
            BLOCK_CLOSE_TOKEN => Self::block_close(),
            other => Self::data(other),
        }
    }

    /// Get the command kind
    #[inline]
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Get the payload (only `Data` commands have one)
    #[inline]
    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    /// Consume the command and return its payload
    #[inline]
    pub fn into_payload(self) -> Option<String> {
        self.payload
    }

    /// Check if this is the end-of-stream marker
    #[inline]
    pub fn is_terminator(&self) -> bool {
        self.kind == CommandKind::Terminator
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.payload) {
            (CommandKind::Data, Some(payload)) => f.write_str(payload),
            (CommandKind::BlockOpen, _) => f.write_str(BLOCK_OPEN_TOKEN),
            (CommandKind::BlockClose, _) => f.write_str(BLOCK_CLOSE_TOKEN),
            (kind, _) => write!(f, "<{}>", kind),
        }
    }
}
