//! Regex-based format validators.
//!
//! This module handles:
//! - Mobile: 11-digit mobile numbers, lenient or carrier-prefix strict
//! - Pattern: full match against a caller-supplied regex

use crate::ConstraintValidator;
use constraints_core::{ConfigError, ConfigResult, FieldType, Value};
use regex::Regex;
use std::sync::LazyLock;

/// Strict mobile numbers: a known carrier prefix followed by 8 digits.
///
/// Prefixes: 130-139, 145, 147, 150-153, 155-159, 166, 170, 173, 175-178,
/// 180-189, 198, 199.
pub const STRICT_MOBILE_PATTERN: &str =
    r"^(?:13[0-9]|14[57]|15[0-35-9]|17[035-8]|18[0-9]|166|198|199)[0-9]{8}$";

/// Lenient mobile numbers: `1` followed by 10 digits.
pub const LENIENT_MOBILE_PATTERN: &str = r"^1[0-9]{10}$";

static STRICT_MOBILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(STRICT_MOBILE_PATTERN).expect("strict mobile pattern compiles"));

static LENIENT_MOBILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(LENIENT_MOBILE_PATTERN).expect("lenient mobile pattern compiles")
});

/// Returns true if `value` is a mobile number under the selected mode.
pub fn is_mobile(value: &str, strict: bool) -> bool {
    if strict {
        STRICT_MOBILE.is_match(value)
    } else {
        LENIENT_MOBILE.is_match(value)
    }
}

fn string_or_mismatch<'a>(
    value: &'a Value,
    field: &str,
    constraint: &str,
) -> ConfigResult<Option<&'a str>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(ConfigError::type_mismatch(
            field,
            constraint,
            "string",
            other.type_name(),
        )),
    }
}

/// Validator for mobile-number constraints.
#[derive(Debug, Clone, Copy)]
pub struct MobileValidator {
    strict: bool,
}

impl MobileValidator {
    /// Creates a mobile validator.
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Whether the strict carrier-prefix pattern is used.
    pub fn is_strict(&self) -> bool {
        self.strict
    }
}

impl ConstraintValidator for MobileValidator {
    fn is_valid(&self, value: &Value, field: &str) -> ConfigResult<bool> {
        Ok(string_or_mismatch(value, field, "mobile")?.is_none_or(|s| is_mobile(s, self.strict)))
    }

    fn accepts(&self, field_type: &FieldType) -> bool {
        *field_type == FieldType::String
    }

    fn expected_type(&self) -> String {
        "string".to_string()
    }
}

/// Validator for pattern constraints. The whole value must match.
#[derive(Debug, Clone)]
pub struct PatternValidator {
    regex: Regex,
}

impl PatternValidator {
    /// Compiles `pattern`, anchored at both ends.
    ///
    /// Returns [`ConfigError::InvalidPattern`] if it does not compile.
    pub fn new(pattern: &str, field: &str) -> ConfigResult<Self> {
        let regex = Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
            ConfigError::InvalidPattern {
                field: field.to_string(),
                error: e.to_string(),
            }
        })?;
        Ok(Self { regex })
    }
}

impl ConstraintValidator for PatternValidator {
    fn is_valid(&self, value: &Value, field: &str) -> ConfigResult<bool> {
        Ok(string_or_mismatch(value, field, "pattern")?.is_none_or(|s| self.regex.is_match(s)))
    }

    fn accepts(&self, field_type: &FieldType) -> bool {
        *field_type == FieldType::String
    }

    fn expected_type(&self) -> String {
        "string".to_string()
    }
}
