//! Engine Errors
//!
//! Deterministic failures of the fairness engine. Every error here is a pure
//! function of its inputs and reproduces identically on retry.

use thiserror::Error;

/// Errors produced by the engine's pure operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Caller-supplied value is outside its valid domain (column choice,
    /// empty seed material, malformed digest).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An index fell outside a table or board. Unreachable when upstream
    /// logic is correct.
    #[error("{what} index {index} out of range (max {max})")]
    OutOfRange {
        /// What was being indexed.
        what: &'static str,
        /// Offending index.
        index: usize,
        /// Largest valid index.
        max: usize,
    },
}

impl EngineError {
    /// Shorthand for [`EngineError::InvalidInput`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::invalid("column 13 outside [0, 12]");
        assert_eq!(err.to_string(), "Invalid input: column 13 outside [0, 12]");

        let err = EngineError::OutOfRange { what: "payout", index: 14, max: 12 };
        assert_eq!(err.to_string(), "payout index 14 out of range (max 12)");
    }
}
