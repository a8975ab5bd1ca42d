//! Payload transforms
//!
//! Sinks may render each command through a numeric transform. Payloads that
//! are not integers, or are out of range, are rendered as an inline error line
//! instead of failing the batch.

use std::fmt;

use thiserror::Error;

/// Largest argument whose factorial fits in a `u64`
pub const MAX_FACTORIAL_ARG: i64 = 20;

/// Largest accepted Fibonacci argument
pub const MAX_FIBONACCI_ARG: i64 = 85;

/// Transform errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// Payload is not an integer
    #[error("not an integer: {input}")]
    NotANumber { input: String },

    /// Integer outside the supported range
    #[error("argument {value} exceeds maximum {max}")]
    OutOfRange { value: i64, max: i64 },
}

/// Per-command payload transform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Transform {
    /// Output the payload unchanged
    #[default]
    Identity,
    /// Output `n!`
    Factorial,
    /// Output the `n`-th Fibonacci number
    Fibonacci,
}

impl Transform {
    /// Get the transform as a static string (config value)
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Factorial => "factorial",
            Self::Fibonacci => "fibonacci",
        }
    }

    /// Display name used in inline error lines
    const fn title(self) -> &'static str {
        match self {
            Self::Identity => "Identity",
            Self::Factorial => "Factorial",
            Self::Fibonacci => "Fibonacci",
        }
    }

    /// Apply the transform to one payload
    pub fn apply(self, payload: &str) -> Result<String, TransformError> {
        match self {
            Self::Identity => Ok(payload.to_string()),
            Self::Factorial => factorial(parse_arg(payload)?).map(|v| v.to_string()),
            Self::Fibonacci => fibonacci(parse_arg(payload)?).map(|v| v.to_string()),
        }
    }

    /// Apply the transform, rendering a failure as an inline error line
    pub fn render(self, payload: &str) -> String {
        self.apply(payload).unwrap_or_else(|_| {
            format!(
                "Error while converting {} to int and calc {}",
                payload,
                self.title()
            )
        })
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn parse_arg(payload: &str) -> Result<i64, TransformError> {
    payload
        .trim()
        .parse()
        .map_err(|_| TransformError::NotANumber {
            input: payload.to_string(),
        })
}

/// `n!`, with `n <= 0` yielding 1
pub fn factorial(n: i64) -> Result<u64, TransformError> {
    if n > MAX_FACTORIAL_ARG {
        return Err(TransformError::OutOfRange {
            value: n,
            max: MAX_FACTORIAL_ARG,
        });
    }
    Ok((2..=n.max(1) as u64).product())
}

/// `n`-th Fibonacci number, with `n <= 0` yielding 0
pub fn fibonacci(n: i64) -> Result<u64, TransformError> {
    if n > MAX_FIBONACCI_ARG {
        return Err(TransformError::OutOfRange {
            value: n,
            max: MAX_FIBONACCI_ARG,
        });
    }
    if n <= 0 {
        return Ok(0);
    }

    let (mut prev, mut curr) = (0u64, 1u64);
    for _ in 1..n {
        (prev, curr) = (curr, prev + curr);
    }
    Ok(curr)
}
