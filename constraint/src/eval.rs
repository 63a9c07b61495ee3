//! Constraint evaluation.

use paramguard_core::Value;
use tracing::debug;

use crate::constraint::{Constraint, ConstraintMap};

/// Options controlling a constraint check.
///
/// Diagnostic verbosity is an explicit per-call value rather than process
/// state, so trace behavior is deterministic and testable.
#[derive(Debug, Clone, Copy)]
pub struct CheckOptions {
    /// Combine collection constraints with AND (true, the default) or OR.
    pub check_all: bool,
    /// Emit an advisory trace event for every predicate evaluation.
    /// Never affects results.
    pub trace: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            check_all: true,
            trace: false,
        }
    }
}

impl CheckOptions {
    /// Options that combine collection constraints with OR.
    pub fn check_any() -> Self {
        Self {
            check_all: false,
            ..Self::default()
        }
    }

    /// Enable the advisory predicate trace.
    pub fn with_trace(mut self) -> Self {
        self.trace = true;
        self
    }
}

/// Check whether a parameter value satisfies the constraints registered
/// under its name.
///
/// A name absent from the map is unconstrained and every value passes.
/// Evaluation never fails: values that cannot be coerced for a comparison
/// simply do not satisfy it.
pub fn check_constraints(
    value: &Value,
    name: &str,
    constraints: &ConstraintMap,
    options: &CheckOptions,
) -> bool {
    match constraints.get(name) {
        Some(constraint) => satisfies(value, constraint, name, options),
        None => true,
    }
}

/// Decide whether a value is a member of the set a constraint allows.
fn satisfies(value: &Value, constraint: &Constraint, name: &str, options: &CheckOptions) -> bool {
    match constraint {
        Constraint::Unconstrained => true,

        Constraint::Type(tag) => tag.matches(value),

        Constraint::Compare(op, bound) => match value.as_number() {
            Some(number) => op.apply(number, *bound),
            // Coercion miss: a silent failure, never an error
            None => false,
        },

        Constraint::Literal(literal) => value == literal,

        Constraint::Matches(re) => match value.as_str() {
            Some(s) => re.is_match(s),
            None => false,
        },

        Constraint::Predicate(pred) => {
            let result = pred.call(value);
            if options.trace {
                debug!(
                    param = name,
                    predicate = pred.name(),
                    value = %value,
                    result,
                    "predicate evaluated"
                );
            }
            result
        }

        Constraint::Composite(items) => {
            if options.check_all {
                items.iter().all(|c| satisfies(value, c, name, options))
            } else {
                items.iter().any(|c| satisfies(value, c, name, options))
            }
        }
    }
}
