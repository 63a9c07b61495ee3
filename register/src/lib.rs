//! Paramguard Register
//!
//! Validate and populate a bag of named parameters in one step.
//!
//! Responsibilities:
//! - Associate parameter names with constraints and default values
//! - Validate candidate values against their declared constraints
//! - Commit assignments atomically, reporting every failing parameter
//! - Backfill unset parameters from declared defaults

mod error;
mod register;

pub use error::{Failure, RegisterError, RegisterResult};
pub use register::{DefaultMap, ParameterRegister};
