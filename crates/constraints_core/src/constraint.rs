//! Constraint declarations.
//!
//! A [`Schema`] lists the fields of one declared type in declaration order.
//! Each [`FieldSpec`] carries the [`ConstraintDescriptor`]s attached to it.
//! Descriptors are immutable once built and shared by every validation call
//! against the same type.

use crate::{Accessor, ConfigError, EnumType, Group};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Which validator applies to a constraint, plus its kind-specific parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintKind {
    /// Value must be present
    NotNull,

    /// Value must be present and non-empty (string, list or object)
    NotEmpty,

    /// Value must resolve to a whitelisted variant of an enum type
    Enum {
        /// The enum type
        enum_type: Arc<EnumType>,
        /// Name of the accessor used to derive variant codes
        accessor: String,
        /// Accepted codes; empty means every variant is accepted
        whitelist: Vec<String>,
    },

    /// Value must be a mobile number
    Mobile {
        /// Strict carrier-prefix check instead of the lenient shape check
        strict: bool,
    },

    /// Value must fully match a regular expression
    Pattern {
        /// The regular expression
        regex: String,
    },

    /// Present values are validated recursively against a nested schema
    Valid {
        /// Schema of the nested object
        schema: Arc<Schema>,
    },

    /// A constraint served by a validator registered under `name`
    Custom {
        /// Registry tag
        name: String,
        /// Free-form parameters handed to the validator factory
        params: BTreeMap<String, String>,
    },
}

impl ConstraintKind {
    /// Returns the tag identifying the validator for this kind.
    pub fn tag(&self) -> &str {
        match self {
            ConstraintKind::NotNull => "not_null",
            ConstraintKind::NotEmpty => "not_empty",
            ConstraintKind::Enum { .. } => "enum",
            ConstraintKind::Mobile { .. } => "mobile",
            ConstraintKind::Pattern { .. } => "pattern",
            ConstraintKind::Valid { .. } => "valid",
            ConstraintKind::Custom { name, .. } => name,
        }
    }

    fn default_message(&self) -> String {
        match self {
            ConstraintKind::NotNull => "must not be null".to_string(),
            ConstraintKind::NotEmpty => "must not be empty".to_string(),
            ConstraintKind::Enum { .. } => "invalid enum value.".to_string(),
            ConstraintKind::Mobile { .. } => "invalid mobile value.".to_string(),
            ConstraintKind::Pattern { regex } => format!("must match \"{}\"", regex),
            ConstraintKind::Valid { .. } => "invalid nested object".to_string(),
            ConstraintKind::Custom { name, .. } => format!("violates constraint '{}'", name),
        }
    }
}

/// Immutable description of one constraint instance.
///
/// # Example
///
/// ```rust
/// use constraints_core::{ConstraintDescriptor, EnumType, EnumVariant, Group};
///
/// let sex = EnumType::new("Sex")
///     .variant(EnumVariant::new("MAN").with_code("man"))
///     .variant(EnumVariant::new("FEMALE").with_code("female"));
///
/// let constraint = ConstraintDescriptor::one_of(sex)
///     .whitelist(["man"])
///     .message("sex can only be man")
///     .in_group(Group::named("update"));
///
/// assert_eq!(constraint.kind.tag(), "enum");
/// assert_eq!(constraint.message, "sex can only be man");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintDescriptor {
    /// Kind and parameters
    pub kind: ConstraintKind,

    /// Message reported when the constraint fails (plain text)
    pub message: String,

    /// Groups under which the constraint is active; empty means default only
    pub groups: Vec<Group>,
}

impl ConstraintDescriptor {
    /// Creates a descriptor with the kind's default message and no groups.
    pub fn new(kind: ConstraintKind) -> Self {
        let message = kind.default_message();
        Self {
            kind,
            message,
            groups: Vec::new(),
        }
    }

    /// Value must be present.
    pub fn not_null() -> Self {
        Self::new(ConstraintKind::NotNull)
    }

    /// Value must be present and non-empty.
    pub fn not_empty() -> Self {
        Self::new(ConstraintKind::NotEmpty)
    }

    /// Value must be a variant (or code) of `enum_type`, read through the
    /// code accessor, with every variant accepted.
    pub fn one_of(enum_type: impl Into<Arc<EnumType>>) -> Self {
        Self::new(ConstraintKind::Enum {
            enum_type: enum_type.into(),
            accessor: Accessor::default().as_str().to_string(),
            whitelist: Vec::new(),
        })
    }

    /// Value must be a mobile number, checked strictly.
    pub fn mobile() -> Self {
        Self::new(ConstraintKind::Mobile { strict: true })
    }

    /// Value must fully match `regex`.
    pub fn pattern(regex: impl Into<String>) -> Self {
        Self::new(ConstraintKind::Pattern {
            regex: regex.into(),
        })
    }

    /// Present values are validated against `schema`.
    ///
    /// The marker cascades whatever groups were requested, so it takes no
    /// groups of its own, and its message is never reported. A field holds at
    /// most one marker. Compilation rejects a marker with groups or a second
    /// marker on the same field.
    pub fn valid(schema: impl Into<Arc<Schema>>) -> Self {
        Self::new(ConstraintKind::Valid {
            schema: schema.into(),
        })
    }

    /// A constraint served by the validator registered under `name`.
    pub fn custom(name: impl Into<String>) -> Self {
        Self::new(ConstraintKind::Custom {
            name: name.into(),
            params: BTreeMap::new(),
        })
    }

    /// Sets the message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Replaces the groups.
    pub fn groups<I, G>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: Into<Group>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Adds one group.
    pub fn in_group(mut self, group: impl Into<Group>) -> Self {
        self.groups.push(group.into());
        self
    }

    /// Sets the accessor of an enum constraint. No effect on other kinds.
    pub fn accessor(self, accessor: Accessor) -> Self {
        self.accessor_name(accessor.as_str())
    }

    /// Sets the accessor of an enum constraint by name. The name is resolved
    /// when the validator is initialized. No effect on other kinds.
    pub fn accessor_name(mut self, name: impl Into<String>) -> Self {
        if let ConstraintKind::Enum { accessor, .. } = &mut self.kind {
            *accessor = name.into();
        }
        self
    }

    /// Sets the whitelist of an enum constraint. No effect on other kinds.
    pub fn whitelist<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let ConstraintKind::Enum { whitelist, .. } = &mut self.kind {
            *whitelist = codes.into_iter().map(Into::into).collect();
        }
        self
    }

    /// Sets the strictness of a mobile constraint. No effect on other kinds.
    pub fn strict(mut self, strict: bool) -> Self {
        if let ConstraintKind::Mobile { strict: s } = &mut self.kind {
            *s = strict;
        }
        self
    }

    /// Adds a parameter to a custom constraint. No effect on other kinds.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let ConstraintKind::Custom { params, .. } = &mut self.kind {
            params.insert(key.into(), value.into());
        }
        self
    }
}

/// Declared type of a field, used to reject incompatible constraints at
/// initialization time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// String field
    String,
    /// Integer field
    Integer,
    /// Floating point field
    Float,
    /// Boolean field
    Boolean,
    /// Enum field of the named type
    Enum(String),
    /// Nested object field
    Object,
    /// List field
    List,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => f.write_str("string"),
            FieldType::Integer => f.write_str("integer"),
            FieldType::Float => f.write_str("float"),
            FieldType::Boolean => f.write_str("boolean"),
            FieldType::Enum(name) => write!(f, "enum:{}", name),
            FieldType::Object => f.write_str("object"),
            FieldType::List => f.write_str("list"),
        }
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(name) = s.strip_prefix("enum:") {
            return Ok(FieldType::Enum(name.to_string()));
        }
        match s {
            "string" => Ok(FieldType::String),
            "integer" | "int" | "int64" => Ok(FieldType::Integer),
            "float" | "float64" => Ok(FieldType::Float),
            "boolean" | "bool" => Ok(FieldType::Boolean),
            "object" => Ok(FieldType::Object),
            "list" => Ok(FieldType::List),
            other => Err(format!("unknown field type '{}'", other)),
        }
    }
}

/// A declared field and its constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Field name
    pub name: String,

    /// Declared type, if known
    pub field_type: Option<FieldType>,

    /// Constraints in declaration order
    pub constraints: Vec<ConstraintDescriptor>,
}

/// The declared fields of one type, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    /// Type name
    pub name: String,

    /// Fields in declaration order
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fails if a field name is declared more than once.
    pub fn check_unique_fields(&self) -> Result<(), ConfigError> {
        for (idx, field) in self.fields.iter().enumerate() {
            if self.fields[..idx].iter().any(|f| f.name == field.name) {
                return Err(ConfigError::DuplicateField {
                    schema: self.name.clone(),
                    field: field.name.clone(),
                });
            }
        }
        Ok(())
    }
}
