//! Source-to-manager driver

use bulk_protocol::CommandSource;

use crate::error::Result;
use crate::manager::BulkManager;

/// Pump commands from `source` into `manager` until the terminator
///
/// Returns the number of commands submitted, terminator excluded.
pub fn drive<S>(source: &mut S, manager: &mut BulkManager) -> Result<u64>
where
    S: CommandSource + ?Sized,
{
    let mut submitted = 0;
    loop {
        let command = source.next_command();
        if command.is_terminator() {
            manager.submit(command)?;
            tracing::debug!(submitted, "command stream ended");
            return Ok(submitted);
        }
        manager.submit(command)?;
        submitted += 1;
    }
}
