//! Serialized form of a declaration document.
//!
//! These types mirror the file layout one to one. They carry names, not
//! resolved references; [`crate::Catalog`] resolves them.

use constraints_core::ValidatorConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A whole declaration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Engine settings
    #[serde(default)]
    pub settings: ValidatorConfig,

    /// Enum types referenced by enum constraints
    #[serde(default)]
    pub enums: Vec<EnumDecl>,

    /// Declared types, in dependency order
    #[serde(default)]
    pub schemas: Vec<SchemaDecl>,
}

/// An enum type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDecl {
    /// Type name
    pub name: String,

    /// Variants in declaration order
    pub variants: Vec<VariantDecl>,
}

/// One enum variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDecl {
    /// Declared name
    pub name: String,

    /// Business code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Value-of string; defaults to the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// A declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDecl {
    /// Type name
    pub name: String,

    /// Fields in declaration order
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

/// A declared field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Field name
    pub name: String,

    /// Declared type, e.g. `string` or `enum:Sex`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,

    /// Constraints in declaration order
    #[serde(default)]
    pub constraints: Vec<ConstraintDecl>,
}

/// A constraint, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConstraintDecl {
    /// Value must be present
    NotNull {
        /// Message override
        #[serde(default)]
        message: Option<String>,
        /// Groups
        #[serde(default)]
        groups: Vec<String>,
    },

    /// Value must be present and non-empty
    NotEmpty {
        /// Message override
        #[serde(default)]
        message: Option<String>,
        /// Groups
        #[serde(default)]
        groups: Vec<String>,
    },

    /// Value must be a whitelisted variant of an enum type
    Enum {
        /// Name of a type declared under `enums`
        enum_type: String,
        /// Accessor name; defaults to the code accessor
        #[serde(default)]
        accessor: Option<String>,
        /// Accepted codes; empty accepts every variant
        #[serde(default)]
        whitelist: Vec<String>,
        /// Message override
        #[serde(default)]
        message: Option<String>,
        /// Groups
        #[serde(default)]
        groups: Vec<String>,
    },

    /// Value must be a mobile number
    Mobile {
        /// Carrier-prefix check; defaults to true
        #[serde(default = "default_strict")]
        strict: bool,
        /// Message override
        #[serde(default)]
        message: Option<String>,
        /// Groups
        #[serde(default)]
        groups: Vec<String>,
    },

    /// Value must fully match a regex
    Pattern {
        /// The regex
        regex: String,
        /// Message override
        #[serde(default)]
        message: Option<String>,
        /// Groups
        #[serde(default)]
        groups: Vec<String>,
    },

    /// Present values are validated against another declared type
    Valid {
        /// Name of a schema declared earlier in the document
        schema: String,
    },

    /// A constraint served by a registered validator
    Custom {
        /// Registry tag
        name: String,
        /// Parameters handed to the factory
        #[serde(default)]
        params: BTreeMap<String, String>,
        /// Message override
        #[serde(default)]
        message: Option<String>,
        /// Groups
        #[serde(default)]
        groups: Vec<String>,
    },
}

fn default_strict() -> bool {
    true
}
