//! Error types for the constraints engine.
//!
//! Two taxonomies are kept apart:
//!
//! - [`ConfigError`]: the validator is wired incorrectly (bad accessor, unknown
//!   whitelist code, constraint attached to an incompatible field). Fatal.
//! - [`BusinessError`]: the validated data is invalid. Produced by assert-mode
//!   validation from the first violation found.
//!
//! [`ValidateError`] carries either one as a distinct variant.

use thiserror::Error;

/// Result type for constraint initialization and evaluation.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Configuration errors: the constraint declarations cannot be honored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The accessor name was explicitly overridden with an empty string
    #[error("enum constraint: accessor is overridden by an empty name")]
    EmptyAccessor,

    /// The accessor name is not one of the supported accessor kinds
    #[error("unknown enum accessor '{0}'")]
    UnknownAccessor(String),

    /// The accessor exists in general but not on this enum type
    #[error("accessor '{accessor}' cannot be resolved on enum type {enum_type}")]
    UnresolvableAccessor {
        /// Enum type name
        enum_type: String,
        /// Accessor that failed to resolve
        accessor: String,
    },

    /// A whitelist entry does not resolve to any variant
    #[error("enum value '{code}' does not exist for {enum_type}")]
    UnknownWhitelistCode {
        /// Enum type name
        enum_type: String,
        /// The unresolvable whitelist code
        code: String,
    },

    /// A constraint was attached to a field of an incompatible type
    #[error("constraint '{constraint}' on field '{field}' expects {expected}, found {actual}")]
    TypeMismatch {
        /// Field path
        field: String,
        /// Constraint tag
        constraint: String,
        /// Expected value type
        expected: String,
        /// Actual value type
        actual: String,
    },

    /// A pattern constraint carries a regex that does not compile
    #[error("invalid regex pattern for field '{field}': {error}")]
    InvalidPattern {
        /// Field name
        field: String,
        /// Regex compilation error
        error: String,
    },

    /// No validator is registered for the constraint tag
    #[error("no validator registered for constraint '{0}'")]
    UnknownConstraint(String),

    /// A declaration references an enum type that is not defined
    #[error("unknown enum type '{0}'")]
    UnknownEnumType(String),

    /// A declaration references a schema that is not defined
    #[error("unknown schema '{0}'")]
    UnknownSchema(String),

    /// A nested `valid` marker is declared twice or carries groups
    #[error("field '{field}': {reason}")]
    InvalidNestedMarker {
        /// Field name
        field: String,
        /// What is wrong with the marker
        reason: String,
    },

    /// A schema declares the same field twice
    #[error("schema '{schema}' declares field '{field}' more than once")]
    DuplicateField {
        /// Schema name
        schema: String,
        /// Duplicated field name
        field: String,
    },

    /// Single-property validation was asked for a property the schema lacks
    #[error("schema '{schema}' has no property '{property}'")]
    UnknownProperty {
        /// Schema name
        schema: String,
        /// Requested property
        property: String,
    },
}

impl ConfigError {
    /// Creates a new type mismatch error.
    pub fn type_mismatch(
        field: impl Into<String>,
        constraint: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            constraint: constraint.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Business-level error raised by assert-mode validation.
///
/// `code` is derived from the violating field path, `message` is the
/// violation's message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct BusinessError {
    /// Normalized error code, e.g. `err_user_name`
    pub code: String,
    /// Human-readable message
    pub message: String,
}

impl BusinessError {
    /// Creates a new business error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Outcome of a failed assert-mode validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidateError {
    /// The instance violates at least one constraint
    #[error(transparent)]
    Invalid(#[from] BusinessError),

    /// The validator is misconfigured
    #[error("validator misconfigured: {0}")]
    Config(#[from] ConfigError),
}

impl ValidateError {
    /// Returns the business error if the data was invalid.
    pub fn as_business(&self) -> Option<&BusinessError> {
        match self {
            ValidateError::Invalid(e) => Some(e),
            ValidateError::Config(_) => None,
        }
    }

    /// Returns true if the error reports a misconfiguration.
    pub fn is_config(&self) -> bool {
        matches!(self, ValidateError::Config(_))
    }
}
