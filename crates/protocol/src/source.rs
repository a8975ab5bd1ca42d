//! Command sources
//!
//! A `CommandSource` yields commands one at a time. End of stream is reported
//! as a `Terminator` command, never as an error, and a source keeps returning
//! `Terminator` once exhausted.

use std::collections::VecDeque;
use std::io::BufRead;

use crate::Result;
use crate::command::Command;

/// Anything that produces an ordered sequence of commands
pub trait CommandSource {
    /// Get the next command, `Terminator` at end of stream
    fn next_command(&mut self) -> Command;
}

/// Line-oriented command reader
///
/// Reads one command per line from any `BufRead`. Line endings (`\n` or
/// `\r\n`) are stripped; the remaining text is classified with
/// `Command::parse_line`. Bytes that are not valid UTF-8 are replaced with
/// U+FFFD, so a malformed line is still data and never ends the stream.
///
/// # Example
///
/// ```
/// use bulk_protocol::{CommandKind, CommandSource, LineReader};
///
/// let mut reader = LineReader::new("cmd1\n{\n".as_bytes());
/// assert_eq!(reader.next_command().payload(), Some("cmd1"));
/// assert_eq!(reader.next_command().kind(), CommandKind::BlockOpen);
/// assert!(reader.next_command().is_terminator());
/// ```
#[derive(Debug)]
pub struct LineReader<R> {
    reader: R,
    line: Vec<u8>,
    lines_read: u64,
    exhausted: bool,
}

impl<R: BufRead> LineReader<R> {
    /// Create a reader over the given input
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            lines_read: 0,
            exhausted: false,
        }
    }

    /// Number of lines successfully read so far
    #[inline]
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Read the next command, surfacing I/O errors
    ///
    /// Returns `Ok(Terminator)` at end of input.
    pub fn read_command(&mut self) -> Result<Command> {
        if self.exhausted {
            return Ok(Command::terminator());
        }

        self.line.clear();
        let read = self.reader.read_until(b'\n', &mut self.line).inspect_err(|_| {
            self.exhausted = true;
        })?;

        if read == 0 {
            self.exhausted = true;
            return Ok(Command::terminator());
        }

        self.lines_read += 1;
        let line = String::from_utf8_lossy(&self.line);
        let line = line
            .strip_suffix('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .unwrap_or(&*line);

        Ok(Command::parse_line(line))
    }
}

impl<R: BufRead> CommandSource for LineReader<R> {
    fn next_command(&mut self) -> Command {
        match self.read_command() {
            Ok(command) => command,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    lines_read = self.lines_read,
                    "command source failed, ending stream"
                );
                Command::terminator()
            }
        }
    }
}

/// In-memory command source
///
/// Useful for tests and for replaying a fixed command list.
#[derive(Debug, Default, Clone)]
pub struct VecSource {
    commands: VecDeque<Command>,
}

impl VecSource {
    /// Create a source from prepared commands
    pub fn new(commands: impl IntoIterator<Item = Command>) -> Self {
        Self {
            commands: commands.into_iter().collect(),
        }
    }

    /// Create a source by classifying each line
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(lines.into_iter().map(|l| Command::parse_line(l.as_ref())))
    }

    /// Number of commands left before the implicit terminator
    #[inline]
    pub fn remaining(&self) -> usize {
        self.commands.len()
    }
}

impl CommandSource for VecSource {
    fn next_command(&mut self) -> Command {
        self.commands
            .pop_front()
            .unwrap_or_else(Command::terminator)
    }
}
