//! Validator registry.
//!
//! Maps constraint tags to factories that build a [`ConstraintValidator`]
//! from a [`ConstraintDescriptor`]. The built-in kinds are registered by
//! [`ValidatorRegistry::with_builtins`]; hosts add their own through
//! [`ValidatorRegistry::register`].

use crate::{EnumValidator, MobileValidator, NotEmptyValidator, NotNullValidator, PatternValidator};
use constraints_core::{
    ConfigError, ConfigResult, ConstraintDescriptor, ConstraintKind, FieldType, Value,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Checks one runtime value against one initialized constraint.
///
/// Implementations are built once per constraint and shared by every
/// validation call, so they must be immutable after construction.
pub trait ConstraintValidator: Send + Sync + fmt::Debug {
    /// Returns whether `value` satisfies the constraint.
    ///
    /// A value of a type the validator cannot handle is a configuration
    /// error, not a violation.
    fn is_valid(&self, value: &Value, field: &str) -> ConfigResult<bool>;

    /// Whether a field declared with `field_type` can carry this constraint.
    fn accepts(&self, _field_type: &FieldType) -> bool {
        true
    }

    /// Human-readable description of the accepted field types.
    fn expected_type(&self) -> String {
        "any".to_string()
    }
}

/// Builds a validator for one descriptor on the named field.
pub type ValidatorFactory = Arc<
    dyn Fn(&ConstraintDescriptor, &str) -> ConfigResult<Box<dyn ConstraintValidator>>
        + Send
        + Sync,
>;

/// Tag-to-factory lookup table.
///
/// # Example
///
/// ```rust
/// use constraints_core::{ConfigResult, ConstraintDescriptor, Value};
/// use constraints_validator::{ConstraintValidator, ValidatorRegistry};
///
/// #[derive(Debug)]
/// struct Positive;
///
/// impl ConstraintValidator for Positive {
///     fn is_valid(&self, value: &Value, _field: &str) -> ConfigResult<bool> {
///         Ok(value.as_int().is_none_or(|n| n > 0))
///     }
/// }
///
/// let mut registry = ValidatorRegistry::with_builtins();
/// registry.register("positive", |_, _| Ok(Box::new(Positive)));
///
/// let validator = registry
///     .create(&ConstraintDescriptor::custom("positive"), "age")
///     .unwrap();
/// assert!(!validator.is_valid(&Value::Int(-1), "age").unwrap());
/// ```
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    factories: HashMap<String, ValidatorFactory>,
}

impl ValidatorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with every built-in constraint kind registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        registry.register("not_null", |_, _| Ok(Box::new(NotNullValidator)));
        registry.register("not_empty", |_, _| Ok(Box::new(NotEmptyValidator)));
        registry.register("enum", |descriptor, field| match &descriptor.kind {
            ConstraintKind::Enum {
                enum_type,
                accessor,
                whitelist,
            } => Ok(Box::new(EnumValidator::new(
                Arc::clone(enum_type),
                accessor,
                whitelist,
            )?)),
            other => Err(kind_mismatch(field, "enum", other)),
        });
        registry.register("mobile", |descriptor, field| match &descriptor.kind {
            ConstraintKind::Mobile { strict } => Ok(Box::new(MobileValidator::new(*strict))),
            other => Err(kind_mismatch(field, "mobile", other)),
        });
        registry.register("pattern", |descriptor, field| match &descriptor.kind {
            ConstraintKind::Pattern { regex } => Ok(Box::new(PatternValidator::new(regex, field)?)),
            other => Err(kind_mismatch(field, "pattern", other)),
        });

        registry
    }

    /// Registers `factory` under `tag`, replacing any previous entry.
    pub fn register<F>(&mut self, tag: impl Into<String>, factory: F)
    where
        F: Fn(&ConstraintDescriptor, &str) -> ConfigResult<Box<dyn ConstraintValidator>>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(tag.into(), Arc::new(factory));
    }

    /// Builds the validator for `descriptor` on `field`.
    ///
    /// Returns [`ConfigError::UnknownConstraint`] if no factory is registered
    /// for the descriptor's tag.
    pub fn create(
        &self,
        descriptor: &ConstraintDescriptor,
        field: &str,
    ) -> ConfigResult<Box<dyn ConstraintValidator>> {
        let tag = descriptor.kind.tag();
        let factory = self
            .factories
            .get(tag)
            .ok_or_else(|| ConfigError::UnknownConstraint(tag.to_string()))?;
        factory(descriptor, field)
    }

    /// Returns true if a factory is registered under `tag`.
    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

fn kind_mismatch(field: &str, tag: &str, kind: &ConstraintKind) -> ConfigError {
    ConfigError::type_mismatch(field, tag, tag, kind.tag())
}

static GLOBAL_REGISTRY: OnceLock<Arc<ValidatorRegistry>> = OnceLock::new();

/// The process-wide registry holding the built-in constraint kinds.
pub fn global_registry() -> Arc<ValidatorRegistry> {
    Arc::clone(GLOBAL_REGISTRY.get_or_init(|| Arc::new(ValidatorRegistry::with_builtins())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtins_registered() {
        let registry = ValidatorRegistry::with_builtins();
        assert_eq!(
            registry.tags(),
            vec!["enum", "mobile", "not_empty", "not_null", "pattern"]
        );
        assert!(!registry.contains("valid"));
    }

    #[test]
    fn test_unknown_constraint() {
        let registry = ValidatorRegistry::new();
        let err = registry
            .create(&ConstraintDescriptor::not_null(), "id")
            .unwrap_err();
        assert_eq!(err, ConfigError::UnknownConstraint("not_null".to_string()));
    }

    #[test]
    fn test_factory_errors_propagate() {
        let registry = ValidatorRegistry::with_builtins();
        let err = registry
            .create(&ConstraintDescriptor::pattern("("), "code")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }

    #[test]
    fn test_register_replaces_existing_factory() {
        #[derive(Debug)]
        struct AlwaysFails;

        impl ConstraintValidator for AlwaysFails {
            fn is_valid(&self, _value: &Value, _field: &str) -> ConfigResult<bool> {
                Ok(false)
            }
        }

        let mut registry = ValidatorRegistry::with_builtins();
        registry.register("not_null", |_, _| Ok(Box::new(AlwaysFails)));

        let validator = registry
            .create(&ConstraintDescriptor::not_null(), "id")
            .unwrap();
        assert!(!validator.is_valid(&Value::Int(1), "id").unwrap());
    }

    #[test]
    fn test_global_registry_is_shared() {
        let a = global_registry();
        let b = global_registry();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(a.contains("mobile"));
    }
}
