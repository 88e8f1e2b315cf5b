//! Parser for constraint declaration documents (YAML/TOML formats).
//!
//! This crate loads enum types, schemas and engine settings from YAML and
//! TOML files into a resolved [`Catalog`], and reads JSON instance records
//! into the engine's value model.
//!
//! # Example
//!
//! ```rust
//! use constraints_parser::{parse_record_json, parse_yaml};
//!
//! let yaml = r#"
//! settings:
//!   error_code_prefix: "err_"
//! enums:
//!   - name: Sex
//!     variants:
//!       - { name: MAN, code: man }
//!       - { name: FEMALE, code: female }
//!       - { name: FREAK, code: freak }
//! schemas:
//!   - name: Account
//!     fields:
//!       - name: userName
//!         type: string
//!         constraints:
//!           - type: not_empty
//!             message: user name is required
//!       - name: sex
//!         constraints:
//!           - type: enum
//!             enum_type: Sex
//!             whitelist: [man, female]
//!             message: sex can only be man or female
//! "#;
//!
//! let catalog = parse_yaml(yaml).expect("Failed to parse declarations");
//! let engine = catalog.engine();
//! let account = catalog.compile(&engine, "Account").unwrap();
//!
//! let record = parse_record_json(r#"{"userName": "alice", "sex": "freak"}"#).unwrap();
//! let err = engine.assert_with(&account, &record, &[]).unwrap_err();
//! assert_eq!(err.to_string(), "err_sex: sex can only be man or female");
//! ```

mod catalog;
mod document;

pub use catalog::*;
pub use document::*;

use constraints_core::{ConfigError, Record, Value};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading declarations.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// JSON parsing failed
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,

    /// A field declares a type that does not exist
    #[error("Invalid field type: {0}")]
    InvalidFieldType(String),

    /// A JSON instance record is not an object
    #[error("Expected a JSON object record, found {0}")]
    InvalidRecord(String),

    /// A JSON integer does not fit in 64 signed bits
    #[error("Integer {0} is out of range")]
    IntegerOutOfRange(String),

    /// The declarations reference something undefined
    #[error("Invalid declarations: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported declaration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

/// Parse declarations from a YAML string.
pub fn parse_yaml(content: &str) -> Result<Catalog> {
    let document: Document = serde_yaml_ng::from_str(content)?;
    Catalog::from_document(document)
}

/// Parse declarations from a TOML string.
///
/// # Example
///
/// ```rust
/// use constraints_parser::parse_toml;
///
/// let toml = r#"
/// [settings]
/// fail_fast = true
///
/// [[schemas]]
/// name = "Contact"
///
/// [[schemas.fields]]
/// name = "mobile"
/// constraints = [{ type = "mobile" }]
/// "#;
///
/// let catalog = parse_toml(toml).unwrap();
/// assert!(catalog.config().fail_fast);
/// assert_eq!(catalog.schema("Contact").unwrap().fields.len(), 1);
/// ```
pub fn parse_toml(content: &str) -> Result<Catalog> {
    let document: Document =
        toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?;
    Catalog::from_document(document)
}

/// Detect the document format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `DocumentFormat::Yaml`
/// * `.toml` → `DocumentFormat::Toml`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<DocumentFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(DocumentFormat::Yaml),
        "toml" => Ok(DocumentFormat::Toml),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse declarations from a file with automatic format detection.
///
/// ```no_run
/// use constraints_parser::parse_file;
/// use std::path::Path;
///
/// let catalog = parse_file(Path::new("constraints/account.yml")).unwrap();
/// println!("Loaded {} schemas", catalog.schemas().len());
/// ```
pub fn parse_file(path: &Path) -> Result<Catalog> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        DocumentFormat::Yaml => parse_yaml(&content),
        DocumentFormat::Toml => parse_toml(&content),
    }
}

/// Parse an instance record from a JSON object.
///
/// Missing keys and JSON `null` both read as absent. Integers that do not
/// fit in an `i64` are rejected rather than rounded.
pub fn parse_record_json(content: &str) -> Result<Record> {
    let json: serde_json::Value = serde_json::from_str(content)?;
    check_integer_range(&json)?;
    match Value::from(json) {
        Value::Object(record) => Ok(record),
        other => Err(ParserError::InvalidRecord(other.type_name().to_string())),
    }
}

fn check_integer_range(json: &serde_json::Value) -> Result<()> {
    match json {
        serde_json::Value::Number(n) if n.is_u64() && n.as_i64().is_none() => {
            Err(ParserError::IntegerOutOfRange(n.to_string()))
        }
        serde_json::Value::Array(items) => items.iter().try_for_each(check_integer_range),
        serde_json::Value::Object(map) => map.values().try_for_each(check_integer_range),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use constraints_core::{ConstraintKind, FieldType, Group};
    use pretty_assertions::assert_eq;

    const ACCOUNT_YAML: &str = r#"
enums:
  - name: Sex
    variants:
      - name: MAN
        code: man
      - name: FEMALE
        code: female
      - name: FREAK
        code: freak
schemas:
  - name: Address
    fields:
      - name: addressInfo
        type: string
        constraints:
          - type: not_empty
            message: address info is required
  - name: Account
    fields:
      - name: id
        type: integer
        constraints:
          - type: not_null
            groups: [update]
      - name: sex
        type: enum:Sex
        constraints:
          - type: enum
            enum_type: Sex
            accessor: getCode
            whitelist: [man, female]
      - name: mobile
        constraints:
          - type: mobile
            strict: false
      - name: address
        type: object
        constraints:
          - type: not_null
          - type: valid
            schema: Address
"#;

    #[test]
    fn test_parse_yaml_declarations() {
        let catalog = parse_yaml(ACCOUNT_YAML).expect("Failed to parse YAML");

        assert_eq!(catalog.config().error_code_prefix, "err_");
        assert_eq!(catalog.enum_type("Sex").unwrap().variants().len(), 3);

        let account = catalog.schema("Account").unwrap();
        assert_eq!(account.fields.len(), 4);
        assert_eq!(account.fields[0].field_type, Some(FieldType::Integer));
        assert_eq!(account.fields[0].constraints[0].groups, vec![Group::named("update")]);
        assert_eq!(
            account.fields[1].field_type,
            Some(FieldType::Enum("Sex".to_string()))
        );
        assert_eq!(
            account.fields[2].constraints[0].kind,
            ConstraintKind::Mobile { strict: false }
        );
        assert_eq!(account.fields[3].constraints[1].kind.tag(), "valid");
    }

    #[test]
    fn test_mobile_strict_by_default() {
        let catalog = parse_yaml(
            r#"
schemas:
  - name: Contact
    fields:
      - name: mobile
        constraints:
          - type: mobile
"#,
        )
        .unwrap();

        let contact = catalog.schema("Contact").unwrap();
        assert_eq!(
            contact.fields[0].constraints[0].kind,
            ConstraintKind::Mobile { strict: true }
        );
        assert_eq!(contact.fields[0].constraints[0].message, "invalid mobile value.");
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let result = parse_yaml("schemas: [ {name: Broken, fields: ");
        assert!(matches!(result.unwrap_err(), ParserError::YamlError(_)));
    }

    #[test]
    fn test_parse_unknown_constraint_type() {
        let result = parse_yaml(
            r#"
schemas:
  - name: Contact
    fields:
      - name: email
        constraints:
          - type: email
"#,
        );
        assert!(matches!(result.unwrap_err(), ParserError::YamlError(_)));
    }

    #[test]
    fn test_parse_toml_declarations() {
        let toml = r#"
[settings]
error_code_prefix = "account_"

[[enums]]
name = "Sex"
variants = [
    { name = "MAN", code = "man" },
    { name = "FEMALE", code = "female" },
]

[[schemas]]
name = "Account"

[[schemas.fields]]
name = "sex"
constraints = [
    { type = "enum", enum_type = "Sex", whitelist = ["man"], groups = ["create"] },
]

[[schemas.fields]]
name = "code"
constraints = [{ type = "pattern", regex = "[A-Z]{3}" }]
"#;

        let catalog = parse_toml(toml).expect("Failed to parse TOML");
        assert_eq!(catalog.config().error_code_prefix, "account_");
        assert!(!catalog.config().fail_fast);

        let account = catalog.schema("Account").unwrap();
        assert_eq!(account.fields[0].constraints[0].groups, vec![Group::named("create")]);
        assert_eq!(
            account.fields[1].constraints[0].kind,
            ConstraintKind::Pattern {
                regex: "[A-Z]{3}".to_string()
            }
        );
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = parse_toml("[[[invalid syntax");
        assert!(matches!(result.unwrap_err(), ParserError::TomlError(_)));
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(Path::new("a.yaml")).unwrap(), DocumentFormat::Yaml);
        assert_eq!(detect_format(Path::new("a.YML")).unwrap(), DocumentFormat::Yaml);
        assert_eq!(detect_format(Path::new("a.toml")).unwrap(), DocumentFormat::Toml);
        assert!(matches!(
            detect_format(Path::new("a.json")).unwrap_err(),
            ParserError::UnsupportedFormat(_)
        ));
        assert!(matches!(
            detect_format(Path::new("constraints")).unwrap_err(),
            ParserError::InvalidExtension
        ));
    }

    #[test]
    fn test_parse_record_json() {
        let record = parse_record_json(
            r#"{"id": 1, "userName": null, "address": {"addressInfo": "Hangzhou"}}"#,
        )
        .unwrap();

        assert_eq!(record.get("id"), Some(&Value::Int(1)));
        assert!(record.get("userName").is_none_or(Value::is_null));
        assert!(matches!(record.get("address"), Some(Value::Object(_))));
    }

    #[test]
    fn test_parse_record_json_rejects_oversized_integers() {
        let err = parse_record_json(r#"{"id": 18446744073709551615}"#).unwrap_err();
        assert!(matches!(
            err,
            ParserError::IntegerOutOfRange(ref n) if n == "18446744073709551615"
        ));
        assert!(matches!(
            parse_record_json(r#"{"ids": [1, {"id": 9223372036854775808}]}"#).unwrap_err(),
            ParserError::IntegerOutOfRange(_)
        ));

        let record = parse_record_json(r#"{"id": 9223372036854775807, "ratio": 0.5}"#).unwrap();
        assert_eq!(record.get("id"), Some(&Value::Int(i64::MAX)));
        assert_eq!(record.get("ratio"), Some(&Value::Float(0.5)));
    }

    #[test]
    fn test_parse_record_json_rejects_non_objects() {
        assert!(matches!(
            parse_record_json("[1, 2]").unwrap_err(),
            ParserError::InvalidRecord(ref found) if found == "list"
        ));
        assert!(matches!(
            parse_record_json("{").unwrap_err(),
            ParserError::JsonError(_)
        ));
    }
}
