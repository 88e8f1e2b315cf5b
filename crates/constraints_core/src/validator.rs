//! Host-facing traits and validation result types.
//!
//! Hosts expose their data through [`FieldSource`] and declare their
//! constraints through [`Validatable`]. Validation produces a
//! [`ValidationReport`] of [`Violation`]s in discovery order.

use crate::{Record, Schema, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Anything exposing named field values.
///
/// Fields the source does not know read as [`Value::Null`].
pub trait FieldSource {
    /// Returns the runtime value of the named field.
    fn field(&self, name: &str) -> Value;
}

impl FieldSource for Record {
    fn field(&self, name: &str) -> Value {
        self.get(name).cloned().unwrap_or_default()
    }
}

/// A host type with declared constraints.
///
/// `schema()` is called once per type; the engine caches the initialized
/// result and reuses it for every later validation of that type.
///
/// # Example
///
/// ```rust
/// use constraints_core::{FieldBuilder, FieldSource, Schema, SchemaBuilder, Validatable, Value};
///
/// struct Account {
///     id: Option<i64>,
/// }
///
/// impl FieldSource for Account {
///     fn field(&self, name: &str) -> Value {
///         match name {
///             "id" => self.id.into(),
///             _ => Value::Null,
///         }
///     }
/// }
///
/// impl Validatable for Account {
///     fn schema() -> Schema {
///         SchemaBuilder::new("Account")
///             .field(FieldBuilder::new("id").not_null().build())
///             .build()
///     }
/// }
///
/// assert_eq!(Account { id: None }.field("id"), Value::Null);
/// ```
pub trait Validatable: FieldSource + 'static {
    /// Declares the constraints of this type.
    fn schema() -> Schema;
}

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Prefix of assert-mode error codes
    pub error_code_prefix: String,

    /// Stop collecting at the first violation in collect mode as well
    pub fail_fast: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            error_code_prefix: "err_".to_string(),
            fail_fast: false,
        }
    }
}

impl ValidatorConfig {
    /// Creates a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the error code prefix.
    pub fn with_error_code_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.error_code_prefix = prefix.into();
        self
    }

    /// Sets fail-fast collection.
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }
}

/// One failed constraint evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Dotted path of the field, e.g. `address.addressInfo`
    pub field_path: String,

    /// Resolved message
    pub message: String,

    /// Tag of the failed constraint
    pub constraint: String,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(
        field_path: impl Into<String>,
        message: impl Into<String>,
        constraint: impl Into<String>,
    ) -> Self {
        Self {
            field_path: field_path.into(),
            message: message.into(),
            constraint: constraint.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field_path, self.message)
    }
}

/// Result of a collect-mode validation call.
///
/// Violations are kept in discovery order: field declaration order, then
/// nested traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Whether any violation was recorded
    pub has_errors: bool,

    /// Violations in discovery order
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Creates an empty, successful report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violation.
    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
        self.has_errors = true;
    }

    /// Returns true if no violation was recorded.
    pub fn is_valid(&self) -> bool {
        !self.has_errors
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns the first violation in discovery order.
    pub fn first(&self) -> Option<&Violation> {
        self.violations.first()
    }

    /// Returns the violations recorded for one field path.
    pub fn field_errors(&self, field_path: &str) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.field_path == field_path)
            .collect()
    }

    /// Renders every violation as `path:message `, concatenated.
    pub fn errors_summary(&self) -> String {
        self.violations
            .iter()
            .map(|v| format!("{}:{} ", v.field_path, v.message))
            .collect()
    }

    /// Converts to JSON representation.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "has_errors": self.has_errors,
            "violations": self.violations.iter().map(|v| {
                serde_json::json!({
                    "field": v.field_path,
                    "message": v.message,
                    "constraint": v.constraint,
                })
            }).collect::<Vec<_>>()
        })
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for violation in &self.violations {
            writeln!(f, "{}", violation)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_report() -> ValidationReport {
        let mut report = ValidationReport::new();
        report.push(Violation::new("id", "id must not be null", "not_null"));
        report.push(Violation::new("username", "username is required", "not_empty"));
        report.push(Violation::new("id", "id is out of range", "custom"));
        report
    }

    #[test]
    fn test_empty_report_is_valid() {
        let report = ValidationReport::new();
        assert!(report.is_valid());
        assert!(!report.has_errors);
        assert!(report.first().is_none());
        assert_eq!(report.errors_summary(), "");
    }

    #[test]
    fn test_push_sets_has_errors() {
        let report = sample_report();
        assert!(report.has_errors);
        assert_eq!(report.len(), 3);
        assert_eq!(report.first().map(|v| v.field_path.as_str()), Some("id"));
        assert_eq!(report.field_errors("id").len(), 2);
    }

    #[test]
    fn test_errors_summary() {
        let report = sample_report();
        assert_eq!(
            report.errors_summary(),
            "id:id must not be null username:username is required id:id is out of range "
        );
    }

    #[test]
    fn test_to_json() {
        let mut report = ValidationReport::new();
        report.push(Violation::new("sex", "invalid enum value.", "enum"));

        assert_eq!(
            report.to_json(),
            serde_json::json!({
                "has_errors": true,
                "violations": [
                    { "field": "sex", "message": "invalid enum value.", "constraint": "enum" }
                ]
            })
        );
    }

    #[test]
    fn test_config_defaults_and_partial_deserialize() {
        let config: ValidatorConfig = serde_json::from_str(r#"{"fail_fast": true}"#).unwrap();
        assert_eq!(config.error_code_prefix, "err_");
        assert!(config.fail_fast);
        assert_eq!(ValidatorConfig::new(), ValidatorConfig::default());
    }

    #[test]
    fn test_record_as_field_source() {
        let record = Record::new().with("id", 1i64);
        assert_eq!(record.field("id"), Value::Int(1));
        assert_eq!(record.field("missing"), Value::Null);
    }
}
