//! Batching settings

use serde::Deserialize;

/// Default number of commands per batch outside blocks
pub const DEFAULT_CAPACITY: usize = 3;

/// What happens to a block still open when input ends
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BlockPolicy {
    /// Emit the block contents as a final batch (default)
    #[default]
    Flush,
    /// Drop the block contents
    Discard,
}

impl BlockPolicy {
    /// Get the policy as a config string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flush => "flush",
            Self::Discard => "discard",
        }
    }
}

/// Batching configuration
///
/// # Example
///
/// ```toml
/// [bulk]
/// capacity = 3
/// unterminated_block = "flush"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BulkConfig {
    /// Commands per batch outside explicit blocks
    /// Default: 3
    pub capacity: usize,

    /// Handling of a block left open at end of input
    /// Default: flush
    pub unterminated_block: BlockPolicy,
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            unterminated_block: BlockPolicy::Flush,
        }
    }
}
