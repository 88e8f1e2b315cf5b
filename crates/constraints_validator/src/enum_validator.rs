//! Enum-membership validation.
//!
//! An [`EnumValidator`] is bound to one enum type. At initialization it
//! resolves the accessor, indexes every variant by the code that accessor
//! derives, and resolves the whitelist into a set of variants. Validation is
//! then a lookup against immutable data.

use crate::ConstraintValidator;
use constraints_core::{
    Accessor, ConfigError, ConfigResult, EnumType, EnumVariant, FieldType, Value,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Derives a variant's code; `None` when the enum type lacks that view.
type AccessorFn = fn(&EnumVariant) -> Option<&str>;

fn by_code(variant: &EnumVariant) -> Option<&str> {
    variant.code()
}

fn by_name(variant: &EnumVariant) -> Option<&str> {
    Some(variant.name())
}

fn by_value_of(variant: &EnumVariant) -> Option<&str> {
    Some(variant.value_of())
}

const ACCESSOR_TABLE: [(Accessor, AccessorFn); 3] = [
    (Accessor::Code, by_code),
    (Accessor::Name, by_name),
    (Accessor::ValueOf, by_value_of),
];

fn resolve_accessor(name: &str) -> ConfigResult<(Accessor, AccessorFn)> {
    let accessor: Accessor = name.parse()?;
    ACCESSOR_TABLE
        .iter()
        .find(|(kind, _)| *kind == accessor)
        .copied()
        .ok_or_else(|| ConfigError::UnknownAccessor(name.to_string()))
}

/// Code and whitelist index of one enum constraint. Variants are identified
/// by their position in the enum type.
#[derive(Debug, Clone, Default)]
pub struct EnumIndex {
    code_to_variant: HashMap<String, usize>,
    whitelist: HashSet<usize>,
}

impl EnumIndex {
    /// Resolves a code to a variant position.
    pub fn resolve(&self, code: &str) -> Option<usize> {
        self.code_to_variant.get(code).copied()
    }

    /// Returns true if the variant at `position` is accepted.
    pub fn is_whitelisted(&self, position: usize) -> bool {
        self.whitelist.contains(&position)
    }

    /// Number of distinct codes.
    pub fn code_count(&self) -> usize {
        self.code_to_variant.len()
    }

    /// Number of accepted variants.
    pub fn whitelist_len(&self) -> usize {
        self.whitelist.len()
    }
}

/// Validator for enum-membership constraints.
///
/// # Example
///
/// ```rust
/// use constraints_core::{EnumType, EnumVariant, Value};
/// use constraints_validator::{ConstraintValidator, EnumValidator};
/// use std::sync::Arc;
///
/// let sex = Arc::new(
///     EnumType::new("Sex")
///         .variant(EnumVariant::new("MAN").with_code("man"))
///         .variant(EnumVariant::new("FEMALE").with_code("female"))
///         .variant(EnumVariant::new("FREAK").with_code("freak")),
/// );
///
/// let validator = EnumValidator::new(sex, "getCode", &["man".into(), "female".into()]).unwrap();
/// assert!(validator.is_valid(&Value::from("man"), "sex").unwrap());
/// assert!(!validator.is_valid(&Value::from("freak"), "sex").unwrap());
/// assert!(validator.is_valid(&Value::Null, "sex").unwrap());
/// ```
#[derive(Debug)]
pub struct EnumValidator {
    enum_type: Arc<EnumType>,
    accessor: Accessor,
    index: EnumIndex,
}

impl EnumValidator {
    /// Builds the index for `enum_type`.
    ///
    /// Codes are derived through the accessor in declaration order; when two
    /// variants share a code, the later one wins. An empty whitelist accepts
    /// every variant.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyAccessor`] / [`ConfigError::UnknownAccessor`] if
    ///   the accessor name does not resolve
    /// - [`ConfigError::UnresolvableAccessor`] if some variant lacks the view
    ///   the accessor reads
    /// - [`ConfigError::UnknownWhitelistCode`] if a whitelist code matches no
    ///   variant
    pub fn new(
        enum_type: Arc<EnumType>,
        accessor_name: &str,
        whitelist: &[String],
    ) -> ConfigResult<Self> {
        let (accessor, derive_code) = resolve_accessor(accessor_name)?;

        let mut code_to_variant = HashMap::with_capacity(enum_type.variants().len());
        for (position, variant) in enum_type.variants().iter().enumerate() {
            let code = derive_code(variant).ok_or_else(|| ConfigError::UnresolvableAccessor {
                enum_type: enum_type.name().to_string(),
                accessor: accessor.to_string(),
            })?;
            code_to_variant.insert(code.to_string(), position);
        }

        let whitelist_set = if whitelist.is_empty() {
            (0..enum_type.variants().len()).collect()
        } else {
            whitelist
                .iter()
                .map(|code| {
                    code_to_variant.get(code).copied().ok_or_else(|| {
                        ConfigError::UnknownWhitelistCode {
                            enum_type: enum_type.name().to_string(),
                            code: code.clone(),
                        }
                    })
                })
                .collect::<ConfigResult<HashSet<usize>>>()?
        };

        debug!(
            enum_type = enum_type.name(),
            accessor = %accessor,
            codes = code_to_variant.len(),
            whitelisted = whitelist_set.len(),
            "Built enum index"
        );

        Ok(Self {
            enum_type,
            accessor,
            index: EnumIndex {
                code_to_variant,
                whitelist: whitelist_set,
            },
        })
    }

    /// The enum type this validator is bound to.
    pub fn enum_type(&self) -> &EnumType {
        &self.enum_type
    }

    /// The resolved accessor.
    pub fn accessor(&self) -> Accessor {
        self.accessor
    }

    /// The code and whitelist index.
    pub fn index(&self) -> &EnumIndex {
        &self.index
    }

    fn candidate(&self, value: &Value, field: &str) -> ConfigResult<Option<usize>> {
        match value {
            Value::String(code) => Ok(self.index.resolve(code)),
            Value::Enum(e) if e.enum_type == self.enum_type.name() => {
                Ok(self.enum_type.position(&e.variant))
            }
            Value::Enum(e) => Err(ConfigError::type_mismatch(
                field,
                "enum",
                format!("string or {}", self.enum_type.name()),
                e.enum_type.clone(),
            )),
            other => Err(ConfigError::type_mismatch(
                field,
                "enum",
                format!("string or {}", self.enum_type.name()),
                other.type_name(),
            )),
        }
    }
}

impl ConstraintValidator for EnumValidator {
    fn is_valid(&self, value: &Value, field: &str) -> ConfigResult<bool> {
        if value.is_null() {
            return Ok(true);
        }
        Ok(self
            .candidate(value, field)?
            .is_some_and(|position| self.index.is_whitelisted(position)))
    }

    fn accepts(&self, field_type: &FieldType) -> bool {
        match field_type {
            FieldType::String => true,
            FieldType::Enum(name) => name == self.enum_type.name(),
            _ => false,
        }
    }

    fn expected_type(&self) -> String {
        format!("string or enum:{}", self.enum_type.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use constraints_core::{ConstraintEnum, EnumValue};
    use pretty_assertions::assert_eq;

    fn sex() -> Arc<EnumType> {
        Arc::new(
            EnumType::new("Sex")
                .variant(EnumVariant::new("MAN").with_code("man"))
                .variant(EnumVariant::new("FEMALE").with_code("female"))
                .variant(EnumVariant::new("FREAK").with_code("freak")),
        )
    }

    fn codes(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_whitelist_restricts_codes() {
        let validator = EnumValidator::new(sex(), "getCode", &codes(&["man", "female"])).unwrap();

        assert!(validator.is_valid(&Value::from("man"), "sex").unwrap());
        assert!(validator.is_valid(&Value::from("female"), "sex").unwrap());
        assert!(!validator.is_valid(&Value::from("Man"), "sex").unwrap());
        assert!(!validator.is_valid(&Value::from("freak"), "sex").unwrap());
    }

    #[test]
    fn test_empty_whitelist_accepts_every_variant() {
        let validator = EnumValidator::new(sex(), "getCode", &[]).unwrap();
        for code in ["man", "female", "freak"] {
            assert!(validator.is_valid(&Value::from(code), "sex").unwrap());
        }
        assert!(!validator.is_valid(&Value::from("unknown"), "sex").unwrap());
        assert_eq!(validator.index().whitelist_len(), 3);
    }

    #[test]
    fn test_absent_is_valid() {
        let validator = EnumValidator::new(sex(), "getCode", &codes(&["man"])).unwrap();
        assert!(validator.is_valid(&Value::Null, "sex").unwrap());
    }

    #[test]
    fn test_variant_values_checked_against_whitelist() {
        let sex = sex();
        let validator = EnumValidator::new(Arc::clone(&sex), "getCode", &codes(&["man"])).unwrap();

        assert!(validator.is_valid(&sex.value("MAN"), "sex").unwrap());
        assert!(!validator.is_valid(&sex.value("FREAK"), "sex").unwrap());
    }

    #[test]
    fn test_name_accessor() {
        let validator = EnumValidator::new(sex(), "name", &codes(&["MAN"])).unwrap();
        assert_eq!(validator.accessor(), Accessor::Name);
        assert!(validator.is_valid(&Value::from("MAN"), "sex").unwrap());
        assert!(!validator.is_valid(&Value::from("man"), "sex").unwrap());
    }

    #[test]
    fn test_value_of_accessor_round_trips_strings() {
        let level = Arc::new(
            EnumType::new("Level")
                .variant(EnumVariant::new("LOW").with_value("low-level"))
                .variant(EnumVariant::new("HIGH")),
        );
        let validator = EnumValidator::new(level, "valueOf", &[]).unwrap();
        assert!(validator.is_valid(&Value::from("low-level"), "level").unwrap());
        assert!(validator.is_valid(&Value::from("HIGH"), "level").unwrap());
        assert!(!validator.is_valid(&Value::from("LOW"), "level").unwrap());
    }

    #[test]
    fn test_duplicate_codes_last_variant_wins() {
        let colors = Arc::new(
            EnumType::new("Color")
                .variant(EnumVariant::new("RED").with_code("r"))
                .variant(EnumVariant::new("ROSE").with_code("r")),
        );
        let validator = EnumValidator::new(colors, "getCode", &codes(&["r"])).unwrap();

        assert_eq!(validator.index().resolve("r"), Some(1));
        assert_eq!(validator.index().code_count(), 1);
        assert!(!validator.index().is_whitelisted(0));
        assert!(validator.index().is_whitelisted(1));
    }

    #[test]
    fn test_empty_accessor_is_config_error() {
        let err = EnumValidator::new(sex(), "", &[]).unwrap_err();
        assert_eq!(err, ConfigError::EmptyAccessor);
    }

    #[test]
    fn test_code_accessor_on_enum_without_codes() {
        let plain = Arc::new(EnumType::new("Plain").variant(EnumVariant::new("A")));
        let err = EnumValidator::new(plain, "getCode", &[]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnresolvableAccessor {
                enum_type: "Plain".to_string(),
                accessor: "getCode".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_whitelist_code_fails_at_init() {
        let err = EnumValidator::new(sex(), "getCode", &codes(&["man", "alien"])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownWhitelistCode {
                enum_type: "Sex".to_string(),
                code: "alien".to_string(),
            }
        );
    }

    #[test]
    fn test_incompatible_value_is_config_error() {
        let validator = EnumValidator::new(sex(), "getCode", &[]).unwrap();

        let err = validator.is_valid(&Value::Int(1), "sex").unwrap_err();
        assert!(matches!(err, ConfigError::TypeMismatch { ref field, .. } if field == "sex"));

        let other = Value::Enum(EnumValue::new("Color", "RED"));
        assert!(validator.is_valid(&other, "sex").is_err());
    }

    #[test]
    fn test_accepts_declared_field_types() {
        let validator = EnumValidator::new(sex(), "getCode", &[]).unwrap();
        assert!(validator.accepts(&FieldType::String));
        assert!(validator.accepts(&FieldType::Enum("Sex".to_string())));
        assert!(!validator.accepts(&FieldType::Enum("Color".to_string())));
        assert!(!validator.accepts(&FieldType::Integer));
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Status {
        Active,
        Disabled,
    }

    impl ConstraintEnum for Status {
        fn variants() -> &'static [Self] {
            &[Status::Active, Status::Disabled]
        }

        fn name(&self) -> &'static str {
            match self {
                Status::Active => "ACTIVE",
                Status::Disabled => "DISABLED",
            }
        }

        fn code(&self) -> Option<&'static str> {
            Some(match self {
                Status::Active => "1",
                Status::Disabled => "0",
            })
        }
    }

    #[test]
    fn test_rust_enum_variants_and_codes() {
        let validator =
            EnumValidator::new(Arc::new(EnumType::of::<Status>()), "getCode", &codes(&["1"]))
                .unwrap();

        assert!(validator.is_valid(&Status::Active.to_value(), "status").unwrap());
        assert!(!validator.is_valid(&Status::Disabled.to_value(), "status").unwrap());
        assert!(validator.is_valid(&Value::from("1"), "status").unwrap());
        assert!(!validator.is_valid(&Value::from("0"), "status").unwrap());
    }
}
