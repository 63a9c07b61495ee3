//! The parameter register.

use std::fmt;

use indexmap::IndexMap;
use paramguard_constraint::{check_constraints, CheckOptions, Constraint, ConstraintMap};
use paramguard_core::{Params, Value};
use tracing::warn;

use crate::error::{Failure, RegisterError, RegisterResult};

/// Mapping from parameter name to its default value.
pub type DefaultMap = IndexMap<String, Value>;

/// An insertion-ordered mapping from parameter name to current value,
/// with side maps declaring each parameter's constraint and default.
///
/// Every stored value was accepted by its constraint at assignment time,
/// unless validation was explicitly bypassed ([`set_unchecked`] or the
/// defaults backfill). Insertion order is preserved for display and
/// fingerprinting; it carries no validation semantics.
///
/// [`set_unchecked`]: ParameterRegister::set_unchecked
#[derive(Debug, Default)]
pub struct ParameterRegister {
    values: Params,
    constraints: ConstraintMap,
    defaults: DefaultMap,
    options: CheckOptions,
}

impl ParameterRegister {
    /// Create a register with the given constraint and default maps.
    pub fn new(constraints: ConstraintMap, defaults: DefaultMap) -> Self {
        Self {
            values: Params::new(),
            constraints,
            defaults,
            options: CheckOptions::default(),
        }
    }

    /// Replace the options used by validating operations.
    pub fn with_options(mut self, options: CheckOptions) -> Self {
        self.options = options;
        self
    }

    /// Declare a parameter: insert/overwrite its constraint and default.
    ///
    /// This only declares the schema; no validation is performed and the
    /// current value, if any, is untouched. Absent options are recorded as
    /// [`Constraint::Unconstrained`] and [`Value::Null`] placeholders.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        constraint: Option<Constraint>,
        default: Option<Value>,
    ) {
        let name = name.into();
        self.constraints
            .insert(name.clone(), constraint.unwrap_or(Constraint::Unconstrained));
        self.defaults.insert(name, default.unwrap_or(Value::Null));
    }

    /// Check every supplied pair against its declared constraint.
    ///
    /// Pure: returns one verdict per pair and mutates nothing.
    pub fn check_kwargs(&self, params: &Params) -> IndexMap<String, bool> {
        params
            .iter()
            .map(|(name, value)| {
                let ok = check_constraints(value, name, &self.constraints, &self.options);
                (name.clone(), ok)
            })
            .collect()
    }

    /// Validate and assign parameters, all or nothing.
    ///
    /// Every supplied pair is checked before any assignment, so a failing
    /// call leaves the register unchanged. The error carries every
    /// rejected parameter along with its constraint and offending value.
    pub fn set(&mut self, params: Params) -> RegisterResult<()> {
        let mut failures = Vec::new();
        for (name, value) in &params {
            if !check_constraints(value, name, &self.constraints, &self.options) {
                failures.push(Failure {
                    name: name.clone(),
                    constraint: self
                        .constraints
                        .get(name)
                        .cloned()
                        .unwrap_or(Constraint::Unconstrained),
                    value: value.clone(),
                });
            }
        }
        if !failures.is_empty() {
            return Err(RegisterError::validation_failed(failures));
        }

        for (name, value) in params {
            self.values.insert(name, value);
        }
        Ok(())
    }

    /// Assign parameters without validation.
    pub fn set_unchecked(&mut self, params: Params) {
        for (name, value) in params {
            self.values.insert(name, value);
        }
    }

    /// Backfill unset parameters from defaults, without validating them.
    ///
    /// The effective default source is the explicit argument if given,
    /// else the register's own defaults. A parameter is unset when its
    /// value is absent or Null. With no default source at all this is a
    /// reported no-op.
    pub fn set_uninitialized_params(&mut self, defaults: Option<&DefaultMap>) {
        let source = match defaults {
            Some(map) => map,
            None if !self.defaults.is_empty() => &self.defaults,
            None => {
                warn!("no defaults available, nothing to backfill");
                return;
            }
        };

        let pending: Vec<(String, Value)> = source
            .iter()
            .filter(|(name, _)| self.values.get(name.as_str()).map_or(true, Value::is_null))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        for (name, value) in pending {
            self.values.insert(name, value);
        }
    }

    // ==================== Lookups ====================

    /// Get the current value of a parameter.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Check if a parameter currently has a value.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of assigned parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no parameter has been assigned.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate the assigned parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Iterate the assigned parameter names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|name| name.as_str())
    }

    /// The declared constraints.
    pub fn constraints(&self) -> &ConstraintMap {
        &self.constraints
    }

    /// The declared defaults.
    pub fn defaults(&self) -> &DefaultMap {
        &self.defaults
    }

    /// Canonical order-dependent fingerprint of the current assignments:
    /// comma-joined `name:value` pairs in insertion order. Suitable as a
    /// cache key for the register's state.
    pub fn hashable_str(&self) -> String {
        self.values
            .iter()
            .map(|(name, value)| format!("{}:{}", name, value))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for ParameterRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParameterRegister")?;
        for (name, value) in &self.values {
            write!(f, "\n  {}: {:?}", name, value)?;
        }
        write!(f, "\nConstraints")?;
        for (name, constraint) in &self.constraints {
            write!(f, "\n  {}: {}", name, constraint)?;
        }
        write!(f, "\nDefaults")?;
        for (name, value) in &self.defaults {
            write!(f, "\n  {}: {:?}", name, value)?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paramguard_core::{params, TypeTag};

    fn test_register() -> ParameterRegister {
        let mut register = ParameterRegister::default();
        register.register(
            "size",
            Some(Constraint::all_of([
                Constraint::parse_spec(">=1").unwrap(),
                Constraint::parse_spec("<5").unwrap(),
            ])),
            Some(Value::Int(1)),
        );
        register.register(
            "mode",
            Some(Constraint::of_type(TypeTag::String)),
            Some(Value::String("auto".to_string())),
        );
        register.register("label", None, None);
        register
    }

    #[test]
    fn test_register_declares_schema_only() {
        // GIVEN
        let register = test_register();

        // THEN constraints and defaults are declared but nothing is assigned
        assert!(register.is_empty());
        assert_eq!(register.constraints().len(), 3);
        assert_eq!(register.defaults().len(), 3);
        assert!(matches!(
            register.constraints().get("label"),
            Some(Constraint::Unconstrained)
        ));
        assert_eq!(register.defaults().get("label"), Some(&Value::Null));
    }

    #[test]
    fn test_check_kwargs_is_pure_and_idempotent() {
        // GIVEN
        let register = test_register();
        let params = params! { "size" => 3i64, "mode" => 7i64 };

        // WHEN checked twice without mutation
        let first = register.check_kwargs(&params);
        let second = register.check_kwargs(&params);

        // THEN verdicts are per-parameter and identical
        assert_eq!(first.get("size"), Some(&true));
        assert_eq!(first.get("mode"), Some(&false));
        assert_eq!(first, second);
        assert!(register.is_empty());
    }

    #[test]
    fn test_set_accepts_valid_params() {
        let mut register = test_register();
        register
            .set(params! { "size" => 2i64, "mode" => "fast" })
            .unwrap();

        assert_eq!(register.get("size"), Some(&Value::Int(2)));
        assert_eq!(register.get("mode"), Some(&Value::String("fast".into())));
    }

    #[test]
    fn test_set_unknown_name_is_unconstrained() {
        let mut register = test_register();
        register.set(params! { "undeclared" => 99i64 }).unwrap();
        assert_eq!(register.get("undeclared"), Some(&Value::Int(99)));
    }

    #[test]
    fn test_set_is_atomic() {
        // GIVEN a register with a committed value
        let mut register = test_register();
        register.set(params! { "size" => 2i64 }).unwrap();

        // WHEN one valid and one invalid parameter are set together
        let result = register.set(params! { "size" => 3i64, "mode" => 7i64 });

        // THEN the call fails and the prior state is fully preserved
        assert!(result.is_err());
        assert_eq!(register.get("size"), Some(&Value::Int(2)));
        assert_eq!(register.get("mode"), None);
    }

    #[test]
    fn test_set_reports_every_failure() {
        let mut register = test_register();
        let err = register
            .set(params! { "size" => 9i64, "mode" => 7i64 })
            .unwrap_err();

        let failures = err.failures();
        assert_eq!(failures.len(), 2);
        let names: Vec<&str> = failures.iter().map(|f| f.name.as_str()).collect();
        assert!(names.contains(&"size"));
        assert!(names.contains(&"mode"));

        let message = err.to_string();
        assert!(message.contains("size expects (>=1, <5) but got 9"));
        assert!(message.contains("mode expects String but got 7"));
    }

    #[test]
    fn test_set_unchecked_bypasses_validation() {
        let mut register = test_register();
        register.set_unchecked(params! { "mode" => 7i64 });
        assert_eq!(register.get("mode"), Some(&Value::Int(7)));
    }

    #[test]
    fn test_backfill_from_own_defaults() {
        // GIVEN size already set, mode unset
        let mut register = test_register();
        register.set(params! { "size" => 3i64 }).unwrap();

        // WHEN
        register.set_uninitialized_params(None);

        // THEN only unset parameters receive their default
        assert_eq!(register.get("size"), Some(&Value::Int(3)));
        assert_eq!(register.get("mode"), Some(&Value::String("auto".into())));
        assert_eq!(register.get("label"), Some(&Value::Null));
    }

    #[test]
    fn test_backfill_from_explicit_defaults() {
        // GIVEN x = 5 and y unset
        let mut register = ParameterRegister::default();
        register.set(params! { "x" => 5i64 }).unwrap();

        let mut defaults = DefaultMap::new();
        defaults.insert("x".to_string(), Value::Int(10));
        defaults.insert("y".to_string(), Value::Int(20));

        // WHEN
        register.set_uninitialized_params(Some(&defaults));

        // THEN x is untouched, y is backfilled
        assert_eq!(register.get("x"), Some(&Value::Int(5)));
        assert_eq!(register.get("y"), Some(&Value::Int(20)));
    }

    #[test]
    fn test_backfill_replaces_null_values() {
        // GIVEN mode holding an explicit Null
        let mut register = test_register();
        register.set_unchecked(params! { "mode" => Value::Null });

        // WHEN
        register.set_uninitialized_params(None);

        // THEN a Null value counts as unset
        assert_eq!(register.get("mode"), Some(&Value::String("auto".into())));
    }

    #[test]
    fn test_backfill_without_defaults_is_noop() {
        let mut register = ParameterRegister::default();
        register.set(params! { "x" => 1i64 }).unwrap();

        register.set_uninitialized_params(None);

        assert_eq!(register.len(), 1);
        assert_eq!(register.get("x"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_backfill_is_unvalidated() {
        // GIVEN a default that violates its own constraint
        let mut register = ParameterRegister::default();
        register.register(
            "n",
            Some(Constraint::parse_spec(">=1").unwrap()),
            Some(Value::Int(0)),
        );

        // WHEN
        register.set_uninitialized_params(None);

        // THEN the default is assigned anyway
        assert_eq!(register.get("n"), Some(&Value::Int(0)));
    }

    #[test]
    fn test_hashable_str_insertion_order() {
        let mut a = ParameterRegister::default();
        a.set(params! { "x" => 1i64, "y" => "two" }).unwrap();

        let mut b = ParameterRegister::default();
        b.set(params! { "x" => 1i64 }).unwrap();
        b.set(params! { "y" => "two" }).unwrap();

        // Same pairs in the same insertion order: identical fingerprints
        assert_eq!(a.hashable_str(), "x:1,y:two");
        assert_eq!(a.hashable_str(), b.hashable_str());

        // Different insertion order is permitted to differ
        let mut c = ParameterRegister::default();
        c.set(params! { "y" => "two", "x" => 1i64 }).unwrap();
        assert_eq!(c.hashable_str(), "y:two,x:1");
    }

    #[test]
    fn test_display_lists_values_constraints_defaults() {
        let mut register = test_register();
        register.set(params! { "size" => 2i64 }).unwrap();

        let rendered = register.to_string();
        assert!(rendered.starts_with("ParameterRegister"));
        assert!(rendered.contains("\n  size: Int(2)"));
        assert!(rendered.contains("\nConstraints"));
        assert!(rendered.contains("\n  size: (>=1, <5)"));
        assert!(rendered.contains("\nDefaults"));
        assert!(rendered.contains("\n  mode: String(\"auto\")"));
    }
}
