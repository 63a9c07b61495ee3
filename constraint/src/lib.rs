//! Paramguard Constraint
//!
//! Decide whether parameter values satisfy declared constraints.
//!
//! Responsibilities:
//! - Model constraint specifications (type tags, numeric comparisons,
//!   literals, string patterns, predicates, and collections of these)
//! - Parse comparison spec strings such as ">=1" with operator
//!   disambiguation
//! - Evaluate a value against the constraints registered under its name

mod constraint;
mod error;
mod eval;

pub use constraint::{CompareOp, Constraint, ConstraintMap, Predicate};
pub use error::{ConstraintError, ConstraintResult};
pub use eval::{check_constraints, CheckOptions};
