//! Presence validators: not-null and not-empty.

use crate::ConstraintValidator;
use constraints_core::{ConfigError, ConfigResult, FieldType, Value};

/// The value must be present.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotNullValidator;

impl ConstraintValidator for NotNullValidator {
    fn is_valid(&self, value: &Value, _field: &str) -> ConfigResult<bool> {
        Ok(!value.is_null())
    }
}

/// The value must be present and non-empty.
///
/// Strings, lists and objects are empty when they have no characters,
/// elements or fields respectively. Other types cannot be empty and are
/// rejected at initialization when declared.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotEmptyValidator;

impl ConstraintValidator for NotEmptyValidator {
    fn is_valid(&self, value: &Value, field: &str) -> ConfigResult<bool> {
        match value {
            Value::Null => Ok(false),
            Value::String(s) => Ok(!s.is_empty()),
            Value::List(items) => Ok(!items.is_empty()),
            Value::Object(record) => Ok(!record.is_empty()),
            other => Err(ConfigError::type_mismatch(
                field,
                "not_empty",
                self.expected_type(),
                other.type_name(),
            )),
        }
    }

    fn accepts(&self, field_type: &FieldType) -> bool {
        matches!(
            field_type,
            FieldType::String | FieldType::List | FieldType::Object
        )
    }

    fn expected_type(&self) -> String {
        "string, list or object".to_string()
    }
}
