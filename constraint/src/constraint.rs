//! Constraint specifications.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use paramguard_core::{TypeTag, Value};
use regex_lite::Regex;

use crate::error::{ConstraintError, ConstraintResult};

/// Mapping from parameter name to its constraint. A name absent from the
/// map is unconstrained.
pub type ConstraintMap = IndexMap<String, Constraint>;

/// A comparison operator recognized in spec strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Le,
    Ge,
    Eq,
    Ne,
    Gt,
    Lt,
}

impl CompareOp {
    /// All operators, two-character symbols before their one-character
    /// prefixes. Prefix matching walks this list in order.
    const PRIORITY: [CompareOp; 6] = [
        CompareOp::Le,
        CompareOp::Ge,
        CompareOp::Eq,
        CompareOp::Ne,
        CompareOp::Gt,
        CompareOp::Lt,
    ];

    /// The spec-string symbol for this operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Le => "<=",
            CompareOp::Ge => ">=",
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
        }
    }

    /// Apply this operator to a pair of numbers.
    pub fn apply(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            CompareOp::Le => lhs <= rhs,
            CompareOp::Ge => lhs >= rhs,
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ne => lhs != rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Lt => lhs < rhs,
        }
    }

    /// Match a spec string against the operator table.
    ///
    /// Returns the operator and the remainder of the string after the
    /// symbol. A symbol only matches when the remainder does not itself
    /// begin with `=`, so `">="` is never read as `">"` followed by a
    /// stray `=`.
    pub(crate) fn match_prefix(spec: &str) -> Option<(CompareOp, &str)> {
        for op in CompareOp::PRIORITY {
            if let Some(rest) = spec.strip_prefix(op.symbol()) {
                if !rest.starts_with('=') {
                    return Some((op, rest));
                }
            }
        }
        None
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A named unary boolean function over values, captured at registration
/// time. The name is only used for diagnostics.
#[derive(Clone)]
pub struct Predicate {
    name: String,
    func: Arc<dyn Fn(&Value) -> bool>,
}

impl Predicate {
    /// Create a new predicate.
    pub fn new(name: impl Into<String>, func: impl Fn(&Value) -> bool + 'static) -> Self {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// The diagnostic name of this predicate.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the predicate against a value.
    pub fn call(&self, value: &Value) -> bool {
        (self.func)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").field("name", &self.name).finish()
    }
}

/// A constraint specification for a single parameter.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// No constraint; always satisfied.
    Unconstrained,
    /// The value's runtime type must match the tag.
    Type(TypeTag),
    /// The value, coerced to a number, must satisfy the comparison.
    /// Coercion failure is a constraint failure, not an error.
    Compare(CompareOp, f64),
    /// The value must equal the literal by native equality.
    Literal(Value),
    /// The value must be a string matching the pattern.
    Matches(Regex),
    /// The predicate must return true for the value.
    Predicate(Predicate),
    /// A collection of constraints, combined with AND or OR depending on
    /// the evaluation options.
    Composite(Vec<Constraint>),
}

impl Constraint {
    /// Parse a spec string.
    ///
    /// Strings with a recognized comparison-operator prefix become
    /// [`Constraint::Compare`]; the remainder must then parse as a
    /// floating-point bound. Every other string is a literal equality
    /// constraint on the string itself.
    pub fn parse_spec(spec: &str) -> ConstraintResult<Constraint> {
        match CompareOp::match_prefix(spec) {
            Some((op, rest)) => {
                let bound = rest
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| ConstraintError::invalid_bound(spec))?;
                Ok(Constraint::Compare(op, bound))
            }
            None => Ok(Constraint::Literal(Value::String(spec.to_string()))),
        }
    }

    /// Constrain to a runtime type.
    pub fn of_type(tag: TypeTag) -> Constraint {
        Constraint::Type(tag)
    }

    /// Constrain to equality with a literal value.
    pub fn literal(value: impl Into<Value>) -> Constraint {
        Constraint::Literal(value.into())
    }

    /// Constrain to numbers greater than or equal to `bound`.
    pub fn at_least(bound: f64) -> Constraint {
        Constraint::Compare(CompareOp::Ge, bound)
    }

    /// Constrain to numbers less than or equal to `bound`.
    pub fn at_most(bound: f64) -> Constraint {
        Constraint::Compare(CompareOp::Le, bound)
    }

    /// Constrain strings to a regex pattern.
    pub fn matches(pattern: &str) -> ConstraintResult<Constraint> {
        let re = Regex::new(pattern)
            .map_err(|e| ConstraintError::invalid_pattern(pattern, e.to_string()))?;
        Ok(Constraint::Matches(re))
    }

    /// Constrain with an arbitrary named predicate.
    pub fn predicate(name: impl Into<String>, func: impl Fn(&Value) -> bool + 'static) -> Constraint {
        Constraint::Predicate(Predicate::new(name, func))
    }

    /// Combine several constraints into a collection.
    pub fn all_of(items: impl IntoIterator<Item = Constraint>) -> Constraint {
        Constraint::Composite(items.into_iter().collect())
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Unconstrained => write!(f, "unconstrained"),
            Constraint::Type(tag) => write!(f, "{}", tag),
            Constraint::Compare(op, bound) => write!(f, "{}{}", op, bound),
            Constraint::Literal(Value::String(s)) => write!(f, "{:?}", s),
            Constraint::Literal(value) => write!(f, "{}", value),
            Constraint::Matches(re) => write!(f, "matches /{}/", re.as_str()),
            Constraint::Predicate(pred) => write!(f, "predicate {}", pred.name()),
            Constraint::Composite(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}
