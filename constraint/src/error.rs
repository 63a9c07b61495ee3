//! Constraint error types.

use thiserror::Error;

/// Result type for constraint construction.
pub type ConstraintResult<T> = Result<T, ConstraintError>;

/// Errors that can occur while building a constraint.
///
/// Evaluation itself never fails: a value that cannot satisfy a constraint
/// (including one that cannot be coerced to a number) simply does not
/// satisfy it.
#[derive(Debug, Error)]
pub enum ConstraintError {
    #[error("Invalid numeric bound in comparison spec: {spec}")]
    InvalidBound { spec: String },

    #[error("Invalid match pattern {pattern}: {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl ConstraintError {
    pub fn invalid_bound(spec: impl Into<String>) -> Self {
        Self::InvalidBound { spec: spec.into() }
    }

    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}
