//! Register error types.

use std::fmt;

use paramguard_constraint::Constraint;
use paramguard_core::Value;
use thiserror::Error;

/// Result type for register operations.
pub type RegisterResult<T> = Result<T, RegisterError>;

/// A single rejected parameter: its name, the constraint it was expected
/// to satisfy, and the value that was actually given.
#[derive(Debug, Clone)]
pub struct Failure {
    pub name: String,
    pub constraint: Constraint,
    pub value: Value,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} expects {} but got {}",
            self.name, self.constraint, self.value
        )
    }
}

/// Errors that can occur when assigning parameters.
#[derive(Debug, Error)]
pub enum RegisterError {
    /// One or more supplied values violate their declared constraints.
    /// Carries every offending parameter, not just the first.
    #[error("{}", format_failures(.failures))]
    ValidationFailed { failures: Vec<Failure> },
}

impl RegisterError {
    pub fn validation_failed(failures: Vec<Failure>) -> Self {
        Self::ValidationFailed { failures }
    }

    /// The rejected parameters, if this is a validation failure.
    pub fn failures(&self) -> &[Failure] {
        match self {
            Self::ValidationFailed { failures } => failures,
        }
    }
}

fn format_failures(failures: &[Failure]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
