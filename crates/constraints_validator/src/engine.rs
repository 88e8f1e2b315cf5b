//! Main validation engine.
//!
//! This module provides the `ValidationEngine` that resolves the compiled
//! schema of a type, filters its constraints by group, evaluates them field
//! by field, descends into nested objects and aggregates the violations.

use crate::{
    Aggregator, CompiledField, CompiledSchema, GroupResolver, Mode, SchemaCache, ValidatorRegistry,
    global_registry,
};
use constraints_core::{
    ConfigError, ConfigResult, FieldSource, Group, Schema, Validatable, ValidateError,
    ValidationReport, ValidatorConfig, Value, Violation,
};
use std::sync::Arc;
use tracing::{debug, trace};

/// Validation engine for declared types.
///
/// One engine is meant to be shared: schemas are compiled once per type and
/// cached, and every validation call only reads immutable data.
///
/// # Example
///
/// ```rust
/// use constraints_core::{
///     FieldBuilder, FieldSource, Group, Schema, SchemaBuilder, Validatable, Value,
/// };
/// use constraints_validator::ValidationEngine;
///
/// struct Account {
///     id: Option<i64>,
///     username: String,
/// }
///
/// impl FieldSource for Account {
///     fn field(&self, name: &str) -> Value {
///         match name {
///             "id" => self.id.into(),
///             "username" => self.username.as_str().into(),
///             _ => Value::Null,
///         }
///     }
/// }
///
/// impl Validatable for Account {
///     fn schema() -> Schema {
///         SchemaBuilder::new("Account")
///             .field(FieldBuilder::new("id").not_null().build())
///             .field(FieldBuilder::new("username").not_empty().build())
///             .build()
///     }
/// }
///
/// let engine = ValidationEngine::new();
/// let account = Account { id: None, username: String::new() };
///
/// let report = engine.validate(&account, &[]).unwrap();
/// assert_eq!(report.len(), 2);
///
/// let err = engine.assert_valid(&account, &[]).unwrap_err();
/// assert_eq!(err.as_business().unwrap().code, "err_id");
/// ```
#[derive(Debug)]
pub struct ValidationEngine {
    registry: Arc<ValidatorRegistry>,
    cache: SchemaCache,
    config: ValidatorConfig,
}

impl ValidationEngine {
    /// Creates an engine over the process-wide registry with default settings.
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    /// Creates an engine over the process-wide registry.
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self {
            registry: global_registry(),
            cache: SchemaCache::new(),
            config,
        }
    }

    /// Replaces the registry. Schemas compiled so far are dropped.
    pub fn with_registry(mut self, registry: Arc<ValidatorRegistry>) -> Self {
        self.registry = registry;
        self.cache.clear();
        self
    }

    /// The engine settings.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// The registry validators are built from.
    pub fn registry(&self) -> &ValidatorRegistry {
        &self.registry
    }

    /// Compiles a schema outside the per-type cache.
    pub fn compile(&self, schema: &Schema) -> ConfigResult<CompiledSchema> {
        CompiledSchema::compile(schema, &self.registry)
    }

    /// Returns the cached compiled schema of `T`, compiling it on first use.
    pub fn schema_for<T: Validatable>(&self) -> ConfigResult<Arc<CompiledSchema>> {
        self.cache.get_or_compile::<T>(&self.registry)
    }

    /// Validates `instance` and returns every violation found.
    ///
    /// An empty `groups` slice selects the default group. A configuration
    /// error is returned as `Err`; violations are data in the report.
    pub fn validate<T: Validatable>(
        &self,
        instance: &T,
        groups: &[Group],
    ) -> ConfigResult<ValidationReport> {
        let schema = self.schema_for::<T>()?;
        self.validate_with(&schema, instance, groups)
    }

    /// Validates `instance` and fails with the first violation found.
    pub fn assert_valid<T: Validatable>(
        &self,
        instance: &T,
        groups: &[Group],
    ) -> Result<(), ValidateError> {
        let schema = self.schema_for::<T>()?;
        self.assert_with(&schema, instance, groups)
    }

    /// Validates one property of `instance` against its own constraints.
    ///
    /// Nested objects are not descended into. Violations are keyed by the
    /// bare property name.
    pub fn validate_property<T: Validatable>(
        &self,
        instance: &T,
        property: &str,
        groups: &[Group],
    ) -> ConfigResult<ValidationReport> {
        let schema = self.schema_for::<T>()?;
        self.validate_property_with(&schema, instance, property, groups)
    }

    /// Collect-mode validation of any field source against a compiled schema.
    pub fn validate_with(
        &self,
        schema: &CompiledSchema,
        source: &dyn FieldSource,
        groups: &[Group],
    ) -> ConfigResult<ValidationReport> {
        let mut walk = Walk::new(groups, self.collect_mode());
        walk.schema(schema, source, None)?;

        let report = walk.aggregator.into_report();
        debug!(
            schema = %schema.name,
            groups = groups.len(),
            violations = report.len(),
            "Validated instance"
        );
        Ok(report)
    }

    /// Assert-mode validation of any field source against a compiled schema.
    pub fn assert_with(
        &self,
        schema: &CompiledSchema,
        source: &dyn FieldSource,
        groups: &[Group],
    ) -> Result<(), ValidateError> {
        let mut walk = Walk::new(groups, Mode::FailFast);
        walk.schema(schema, source, None)?;

        let outcome = walk.aggregator.into_assert(&self.config.error_code_prefix);
        debug!(
            schema = %schema.name,
            groups = groups.len(),
            valid = outcome.is_ok(),
            "Asserted instance"
        );
        outcome.map_err(ValidateError::from)
    }

    /// Single-property validation against a compiled schema.
    pub fn validate_property_with(
        &self,
        schema: &CompiledSchema,
        source: &dyn FieldSource,
        property: &str,
        groups: &[Group],
    ) -> ConfigResult<ValidationReport> {
        let field = schema
            .field(property)
            .ok_or_else(|| ConfigError::UnknownProperty {
                schema: schema.name.clone(),
                property: property.to_string(),
            })?;

        let mut walk = Walk::new(groups, self.collect_mode());
        let value = source.field(&field.name);
        walk.constraints(field, &value, property)?;

        let report = walk.aggregator.into_report();
        debug!(
            schema = %schema.name,
            property,
            violations = report.len(),
            "Validated property"
        );
        Ok(report)
    }

    fn collect_mode(&self) -> Mode {
        if self.config.fail_fast {
            Mode::FailFast
        } else {
            Mode::Collect
        }
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// State of one validation call.
struct Walk<'g> {
    groups: &'g [Group],
    aggregator: Aggregator,
}

impl<'g> Walk<'g> {
    fn new(groups: &'g [Group], mode: Mode) -> Self {
        Self {
            groups,
            aggregator: Aggregator::new(mode),
        }
    }

    fn schema(
        &mut self,
        schema: &CompiledSchema,
        source: &dyn FieldSource,
        prefix: Option<&str>,
    ) -> ConfigResult<()> {
        for field in &schema.fields {
            if self.aggregator.is_done() {
                break;
            }

            let path = match prefix {
                Some(parent) => format!("{}.{}", parent, field.name),
                None => field.name.clone(),
            };
            let value = source.field(&field.name);

            self.constraints(field, &value, &path)?;

            if let Some(nested) = &field.nested {
                self.nested(nested, &value, &path)?;
            }
        }
        Ok(())
    }

    fn constraints(&mut self, field: &CompiledField, value: &Value, path: &str) -> ConfigResult<()> {
        for constraint in &field.constraints {
            if self.aggregator.is_done() {
                break;
            }
            if !GroupResolver::is_active(&constraint.groups, self.groups) {
                continue;
            }
            if !constraint.validator.is_valid(value, path)? {
                trace!(
                    field = path,
                    constraint = %constraint.tag,
                    message = %constraint.message,
                    "Constraint violated"
                );
                self.aggregator.record(Violation::new(
                    path,
                    constraint.message.as_str(),
                    constraint.tag.as_str(),
                ));
            }
        }
        Ok(())
    }

    fn nested(&mut self, schema: &CompiledSchema, value: &Value, path: &str) -> ConfigResult<()> {
        match value {
            Value::Null => Ok(()),
            Value::Object(record) => self.schema(schema, record, Some(path)),
            Value::List(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if self.aggregator.is_done() {
                        break;
                    }
                    let item_path = format!("{}[{}]", path, idx);
                    match item {
                        Value::Null => {}
                        Value::Object(record) => self.schema(schema, record, Some(&item_path))?,
                        other => return Err(not_an_object(&item_path, other)),
                    }
                }
                Ok(())
            }
            other => Err(not_an_object(path, other)),
        }
    }
}

fn not_an_object(path: &str, value: &Value) -> ConfigError {
    ConfigError::type_mismatch(path, "valid", "object", value.type_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use constraints_core::{
        ConstraintDescriptor, EnumType, EnumVariant, FieldBuilder, Record, SchemaBuilder,
    };
    use pretty_assertions::assert_eq;

    fn sex() -> EnumType {
        EnumType::new("Sex")
            .variant(EnumVariant::new("MAN").with_code("man"))
            .variant(EnumVariant::new("FEMALE").with_code("female"))
            .variant(EnumVariant::new("FREAK").with_code("freak"))
    }

    fn address_schema() -> Schema {
        SchemaBuilder::new("Address")
            .field(
                FieldBuilder::new("addressInfo")
                    .constraint(ConstraintDescriptor::not_empty().message("address info is required"))
                    .build(),
            )
            .build()
    }

    fn account_schema() -> Schema {
        SchemaBuilder::new("Account")
            .field(
                FieldBuilder::new("id")
                    .constraint(
                        ConstraintDescriptor::not_null()
                            .message("id must not be null")
                            .in_group(Group::named("update")),
                    )
                    .build(),
            )
            .field(
                FieldBuilder::new("userName")
                    .constraint(ConstraintDescriptor::not_empty().message("user name is required"))
                    .build(),
            )
            .field(
                FieldBuilder::new("sex")
                    .constraint(
                        ConstraintDescriptor::one_of(sex())
                            .whitelist(["man", "female"])
                            .message("sex can only be man or female"),
                    )
                    .build(),
            )
            .field(
                FieldBuilder::new("mobile")
                    .constraint(ConstraintDescriptor::mobile())
                    .build(),
            )
            .field(
                FieldBuilder::new("address")
                    .constraint(ConstraintDescriptor::not_null().message("address is required"))
                    .valid(address_schema())
                    .build(),
            )
            .build()
    }

    fn valid_record() -> Record {
        Record::new()
            .with("id", 1i64)
            .with("userName", "alice")
            .with("sex", "female")
            .with("mobile", "15268848621")
            .with("address", Record::new().with("addressInfo", "Hangzhou"))
    }

    fn compiled(engine: &ValidationEngine) -> CompiledSchema {
        engine.compile(&account_schema()).unwrap()
    }

    #[test]
    fn test_valid_record_yields_empty_report() {
        let engine = ValidationEngine::new();
        let report = engine
            .validate_with(&compiled(&engine), &valid_record(), &[])
            .unwrap();
        assert!(report.is_valid());
        assert!(report.is_empty());
    }

    #[test]
    fn test_violations_in_declaration_order() {
        let engine = ValidationEngine::new();
        let record = Record::new()
            .with("userName", "")
            .with("sex", "freak")
            .with("mobile", "10000000000")
            .with("address", Record::new().with("addressInfo", ""));

        let report = engine.validate_with(&compiled(&engine), &record, &[]).unwrap();
        let paths: Vec<&str> = report
            .violations
            .iter()
            .map(|v| v.field_path.as_str())
            .collect();
        assert_eq!(paths, vec!["userName", "sex", "mobile", "address.addressInfo"]);
        assert_eq!(report.violations[2].message, "invalid mobile value.");
    }

    #[test]
    fn test_absent_nested_object_is_not_descended() {
        let engine = ValidationEngine::new();
        let record = Record::new()
            .with("userName", "alice")
            .with("sex", "man");

        let report = engine.validate_with(&compiled(&engine), &record, &[]).unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.violations[0].field_path, "address");
    }

    #[test]
    fn test_groups_select_constraints() {
        let engine = ValidationEngine::new();
        let record = Record::new().with("userName", "");

        let update = engine
            .validate_with(&compiled(&engine), &record, &[Group::named("update")])
            .unwrap();
        assert_eq!(update.len(), 1);
        assert_eq!(update.violations[0].field_path, "id");

        let default = engine
            .validate_with(&compiled(&engine), &record, &[Group::DEFAULT])
            .unwrap();
        assert_eq!(default.field_errors("id").len(), 0);
        assert_eq!(default.field_errors("userName").len(), 1);
    }

    #[test]
    fn test_nested_descends_regardless_of_groups() {
        let engine = ValidationEngine::new();
        let record = valid_record().with("address", Record::new().with("addressInfo", ""));

        let report = engine
            .validate_with(&compiled(&engine), &record, &[Group::named("update")])
            .unwrap();
        // the nested constraint is ungrouped, so it stays inactive for "update"
        assert!(report.is_valid());

        let report = engine.validate_with(&compiled(&engine), &record, &[]).unwrap();
        assert_eq!(report.violations[0].field_path, "address.addressInfo");
    }

    #[test]
    fn test_list_of_objects_validated_per_element() {
        let engine = ValidationEngine::new();
        let schema = engine
            .compile(
                &SchemaBuilder::new("Order")
                    .field(FieldBuilder::new("items").valid(address_schema()).build())
                    .build(),
            )
            .unwrap();
        let record = Record::new().with(
            "items",
            vec![
                Value::from(Record::new().with("addressInfo", "a")),
                Value::Null,
                Value::from(Record::new().with("addressInfo", "")),
            ],
        );

        let report = engine.validate_with(&schema, &record, &[]).unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.violations[0].field_path, "items[2].addressInfo");
    }

    #[test]
    fn test_nested_scalar_is_config_error() {
        let engine = ValidationEngine::new();
        let record = valid_record().with("address", "Hangzhou");

        let err = engine
            .validate_with(&compiled(&engine), &record, &[])
            .unwrap_err();
        assert!(matches!(err, ConfigError::TypeMismatch { ref field, .. } if field == "address"));
    }

    #[test]
    fn test_assert_reports_first_violation() {
        let engine = ValidationEngine::new();
        let record = Record::new()
            .with("userName", "")
            .with("sex", "freak")
            .with("address", Record::new().with("addressInfo", "x"));

        let err = engine
            .assert_with(&compiled(&engine), &record, &[])
            .unwrap_err();
        let business = err.as_business().unwrap();
        assert_eq!(business.code, "err_user_name");
        assert_eq!(business.message, "user name is required");
    }

    #[test]
    fn test_assert_nested_error_code() {
        let engine = ValidationEngine::new();
        let record = valid_record().with("address", Record::new().with("addressInfo", ""));

        let err = engine
            .assert_with(&compiled(&engine), &record, &[])
            .unwrap_err();
        assert_eq!(err.as_business().unwrap().code, "err_address.address_info");
    }

    #[test]
    fn test_assert_error_code_lowercases_leading_capital() {
        let engine = ValidationEngine::new();
        let schema = SchemaBuilder::new("Legacy")
            .field(FieldBuilder::new("Id").not_null().build())
            .field(FieldBuilder::new("UserName").not_null().build())
            .build();
        let compiled = engine.compile(&schema).unwrap();

        let err = engine
            .assert_with(&compiled, &Record::new(), &[])
            .unwrap_err();
        assert_eq!(err.as_business().unwrap().code, "err_id");

        let err = engine
            .assert_with(&compiled, &Record::new().with("Id", 1i64), &[])
            .unwrap_err();
        assert_eq!(err.as_business().unwrap().code, "err_user_name");
    }

    #[test]
    fn test_assert_passes_valid_record() {
        let engine = ValidationEngine::new();
        assert_eq!(
            engine.assert_with(&compiled(&engine), &valid_record(), &[]),
            Ok(())
        );
    }

    #[test]
    fn test_assert_config_error_kept_distinct() {
        let engine = ValidationEngine::new();
        let record = valid_record().with("sex", 3i64);

        let err = engine
            .assert_with(&compiled(&engine), &record, &[])
            .unwrap_err();
        assert!(err.is_config());
        assert!(err.as_business().is_none());
    }

    #[test]
    fn test_custom_error_code_prefix() {
        let engine = ValidationEngine::with_config(
            ValidatorConfig::new().with_error_code_prefix("account."),
        );
        let record = valid_record().with("mobile", "1000000000");

        let err = engine
            .assert_with(&compiled(&engine), &record, &[])
            .unwrap_err();
        assert_eq!(err.as_business().unwrap().code, "account.mobile");
    }

    #[test]
    fn test_fail_fast_collect() {
        let engine = ValidationEngine::with_config(ValidatorConfig::new().with_fail_fast(true));
        let record = Record::new().with("userName", "").with("sex", "freak");

        let report = engine.validate_with(&compiled(&engine), &record, &[]).unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.violations[0].field_path, "userName");
    }

    #[test]
    fn test_validate_property() {
        let engine = ValidationEngine::new();
        let record = Record::new().with("sex", "freak").with("userName", "");
        let schema = compiled(&engine);

        let report = engine
            .validate_property_with(&schema, &record, "sex", &[])
            .unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.violations[0].field_path, "sex");
        assert_eq!(report.violations[0].message, "sex can only be man or female");

        let report = engine
            .validate_property_with(&schema, &record, "address", &[])
            .unwrap();
        assert_eq!(report.field_errors("address").len(), 1);
    }

    #[test]
    fn test_validate_unknown_property() {
        let engine = ValidationEngine::new();
        let err = engine
            .validate_property_with(&compiled(&engine), &Record::new(), "email", &[])
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownProperty {
                schema: "Account".to_string(),
                property: "email".to_string(),
            }
        );
    }
}
