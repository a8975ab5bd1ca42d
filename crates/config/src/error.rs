//! Configuration error types

use std::io;
use thiserror::Error;

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("failed to read config file '{path}': {source}")]
    IoError {
        /// Path to the file
        path: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error - sink bound to a pool that isn't declared
    #[error("sink '{sink}' references unknown pool '{pool}'")]
    UnknownPool {
        /// Name of the sink
        sink: String,
        /// Name of the missing pool
        pool: String,
    },

    /// Validation error - invalid value
    #[error("{component} '{name}' has invalid {field}: {message}")]
    InvalidValue {
        /// Component type
        component: &'static str,
        /// Name of the component
        name: String,
        /// Field name
        field: &'static str,
        /// Error message
        message: String,
    },
}

impl ConfigError {
    /// Create an UnknownPool error
    pub fn unknown_pool(sink: impl Into<String>, pool: impl Into<String>) -> Self {
        Self::UnknownPool {
            sink: sink.into(),
            pool: pool.into(),
        }
    }

    /// Create an InvalidValue error
    pub fn invalid_value(
        component: &'static str,
        name: impl Into<String>,
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            component,
            name: name.into(),
            field,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_pool_error() {
        let err = ConfigError::unknown_pool("console", "fast");
        assert!(err.to_string().contains("'console'"));
        assert!(err.to_string().contains("unknown pool 'fast'"));
    }

    #[test]
    fn test_invalid_value_error() {
        let err = ConfigError::invalid_value("pool", "file", "workers", "must be at least 1");
        assert!(err.to_string().contains("pool 'file'"));
        assert!(err.to_string().contains("workers"));
        assert!(err.to_string().contains("at least 1"));
    }
}
