//! Enum types as seen by enum-membership constraints.
//!
//! An [`EnumType`] is an ordered list of variants. Each variant exposes up to
//! three string views, one per [`Accessor`]: its business code, its declared
//! name, and its value-of string. Rust enums describe themselves through
//! [`ConstraintEnum`]; declaration files build [`EnumType`]s directly.

use crate::{ConfigError, EnumValue, Value};
use std::fmt;
use std::str::FromStr;

/// The string view used to derive a comparable code from an enum variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Accessor {
    /// The variant's business code
    #[default]
    Code,
    /// The variant's declared name
    Name,
    /// The variant's value-of string (defaults to its declared name)
    ValueOf,
}

impl Accessor {
    /// All accessor kinds, in lookup order.
    pub const ALL: [Accessor; 3] = [Accessor::Code, Accessor::Name, Accessor::ValueOf];

    /// Returns the canonical accessor name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Accessor::Code => "getCode",
            Accessor::Name => "name",
            Accessor::ValueOf => "valueOf",
        }
    }
}

impl fmt::Display for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Accessor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err(ConfigError::EmptyAccessor),
            "getCode" | "code" | "by_code" => Ok(Accessor::Code),
            "name" | "by_name" => Ok(Accessor::Name),
            "valueOf" | "value_of" | "by_value_of" => Ok(Accessor::ValueOf),
            other => Err(ConfigError::UnknownAccessor(other.to_string())),
        }
    }
}

/// One declared variant of an enum type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumVariant {
    name: String,
    code: Option<String>,
    value: Option<String>,
}

impl EnumVariant {
    /// Creates a variant with the given declared name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: None,
            value: None,
        }
    }

    /// Sets the business code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the value-of string.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Returns the declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the business code, if the enum type has one.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Returns the value-of string.
    pub fn value_of(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.name)
    }
}

/// An enum type: a name plus its variants in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    name: String,
    variants: Vec<EnumVariant>,
}

impl EnumType {
    /// Creates an enum type without variants.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: Vec::new(),
        }
    }

    /// Appends a variant.
    pub fn variant(mut self, variant: EnumVariant) -> Self {
        self.variants.push(variant);
        self
    }

    /// Describes a Rust enum implementing [`ConstraintEnum`].
    pub fn of<E: ConstraintEnum>() -> Self {
        let variants = E::variants()
            .iter()
            .map(|v| {
                let mut variant = EnumVariant::new(v.name()).with_value(v.value_of());
                if let Some(code) = v.code() {
                    variant = variant.with_code(code);
                }
                variant
            })
            .collect();

        Self {
            name: E::type_name().to_string(),
            variants,
        }
    }

    /// Returns the type name, which is also its identity.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the variants in declaration order.
    pub fn variants(&self) -> &[EnumVariant] {
        &self.variants
    }

    /// Returns the position of the variant with the given declared name.
    pub fn position(&self, variant_name: &str) -> Option<usize> {
        self.variants.iter().position(|v| v.name == variant_name)
    }

    /// Builds a runtime value holding the named variant of this type.
    pub fn value(&self, variant_name: impl Into<String>) -> Value {
        Value::Enum(EnumValue::new(self.name.clone(), variant_name))
    }
}

/// A Rust enum usable with enum-membership constraints.
///
/// ```rust
/// use constraints_core::{ConstraintEnum, EnumType};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// enum Sex {
///     Man,
///     Female,
/// }
///
/// impl ConstraintEnum for Sex {
///     fn variants() -> &'static [Self] {
///         &[Sex::Man, Sex::Female]
///     }
///
///     fn name(&self) -> &'static str {
///         match self {
///             Sex::Man => "MAN",
///             Sex::Female => "FEMALE",
///         }
///     }
///
///     fn code(&self) -> Option<&'static str> {
///         Some(match self {
///             Sex::Man => "man",
///             Sex::Female => "female",
///         })
///     }
/// }
///
/// let sex = EnumType::of::<Sex>();
/// assert_eq!(sex.variants().len(), 2);
/// assert_eq!(sex.variants()[1].code(), Some("female"));
/// ```
pub trait ConstraintEnum: Sized + 'static {
    /// All variants in declaration order.
    fn variants() -> &'static [Self];

    /// The declared variant name.
    fn name(&self) -> &'static str;

    /// The business code. Enums without codes cannot use [`Accessor::Code`].
    fn code(&self) -> Option<&'static str> {
        None
    }

    /// The value-of string.
    fn value_of(&self) -> String {
        self.name().to_string()
    }

    /// The enum type identity.
    ///
    /// Defaults to [`std::any::type_name`], which is module-qualified
    /// (`my_crate::model::Sex`). A field declared as `FieldType::Enum("Sex")`
    /// only accepts this enum when `type_name` is overridden to return `"Sex"`.
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Wraps this variant as a runtime value.
    fn to_value(&self) -> Value {
        Value::Enum(EnumValue::new(Self::type_name(), self.name()))
    }
}
