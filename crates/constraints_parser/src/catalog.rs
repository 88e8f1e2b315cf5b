//! Resolution of a parsed document into schemas.

use crate::{ConstraintDecl, Document, EnumDecl, FieldDecl, ParserError, Result, SchemaDecl};
use constraints_core::{
    ConfigError, ConfigResult, ConstraintDescriptor, ConstraintKind, EnumType, EnumVariant,
    FieldSpec, FieldType, Group, Schema, ValidatorConfig,
};
use constraints_validator::{CompiledSchema, ValidationEngine};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Enum types, schemas and settings loaded from one document.
///
/// # Example
///
/// ```rust
/// use constraints_core::Record;
/// use constraints_parser::parse_yaml;
///
/// let catalog = parse_yaml(r#"
/// schemas:
///   - name: Contact
///     fields:
///       - name: mobile
///         constraints:
///           - type: mobile
///             strict: false
/// "#).unwrap();
///
/// let engine = catalog.engine();
/// let contact = catalog.compile(&engine, "Contact").unwrap();
/// let report = engine
///     .validate_with(&contact, &Record::new().with("mobile", "10000000000"), &[])
///     .unwrap();
/// assert!(report.is_valid());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    config: ValidatorConfig,
    enums: HashMap<String, Arc<EnumType>>,
    schemas: Vec<Arc<Schema>>,
}

impl Catalog {
    /// Resolves every reference in `document`.
    ///
    /// Enum constraints must name a type under `enums`; nested `valid`
    /// constraints must name a schema declared earlier in the document.
    pub fn from_document(document: Document) -> Result<Self> {
        let enums: HashMap<String, Arc<EnumType>> = document
            .enums
            .into_iter()
            .map(|decl| (decl.name.clone(), Arc::new(enum_type(decl))))
            .collect();

        let mut schemas: Vec<Arc<Schema>> = Vec::with_capacity(document.schemas.len());
        for decl in document.schemas {
            let schema = resolve_schema(decl, &enums, &schemas)?;
            schemas.push(Arc::new(schema));
        }

        debug!(
            enums = enums.len(),
            schemas = schemas.len(),
            fail_fast = document.settings.fail_fast,
            "Loaded constraint catalog"
        );

        Ok(Self {
            config: document.settings,
            enums,
            schemas,
        })
    }

    /// The engine settings.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Looks up an enum type by name.
    pub fn enum_type(&self, name: &str) -> Option<&Arc<EnumType>> {
        self.enums.get(name)
    }

    /// Looks up a schema by name.
    pub fn schema(&self, name: &str) -> Option<&Arc<Schema>> {
        self.schemas.iter().rev().find(|s| s.name == name)
    }

    /// Schemas in declaration order.
    pub fn schemas(&self) -> &[Arc<Schema>] {
        &self.schemas
    }

    /// Creates an engine configured with the document's settings.
    pub fn engine(&self) -> ValidationEngine {
        ValidationEngine::with_config(self.config.clone())
    }

    /// Compiles the named schema with `engine`.
    pub fn compile(&self, engine: &ValidationEngine, name: &str) -> ConfigResult<CompiledSchema> {
        let schema = self
            .schema(name)
            .ok_or_else(|| ConfigError::UnknownSchema(name.to_string()))?;
        engine.compile(schema)
    }
}

fn enum_type(decl: EnumDecl) -> EnumType {
    decl.variants
        .into_iter()
        .fold(EnumType::new(decl.name), |enum_type, v| {
            let mut variant = EnumVariant::new(v.name);
            if let Some(code) = v.code {
                variant = variant.with_code(code);
            }
            if let Some(value) = v.value {
                variant = variant.with_value(value);
            }
            enum_type.variant(variant)
        })
}

fn resolve_schema(
    decl: SchemaDecl,
    enums: &HashMap<String, Arc<EnumType>>,
    earlier: &[Arc<Schema>],
) -> Result<Schema> {
    let fields = decl
        .fields
        .into_iter()
        .map(|field| resolve_field(field, enums, earlier))
        .collect::<Result<Vec<_>>>()?;

    Ok(Schema {
        name: decl.name,
        fields,
    })
}

fn resolve_field(
    decl: FieldDecl,
    enums: &HashMap<String, Arc<EnumType>>,
    earlier: &[Arc<Schema>],
) -> Result<FieldSpec> {
    let field_type = decl
        .field_type
        .map(|t| t.parse::<FieldType>().map_err(ParserError::InvalidFieldType))
        .transpose()?;

    let constraints = decl
        .constraints
        .into_iter()
        .map(|c| resolve_constraint(c, enums, earlier))
        .collect::<ConfigResult<Vec<_>>>()?;

    Ok(FieldSpec {
        name: decl.name,
        field_type,
        constraints,
    })
}

fn resolve_constraint(
    decl: ConstraintDecl,
    enums: &HashMap<String, Arc<EnumType>>,
    earlier: &[Arc<Schema>],
) -> ConfigResult<ConstraintDescriptor> {
    let (descriptor, message, groups) = match decl {
        ConstraintDecl::NotNull { message, groups } => {
            (ConstraintDescriptor::not_null(), message, groups)
        }
        ConstraintDecl::NotEmpty { message, groups } => {
            (ConstraintDescriptor::not_empty(), message, groups)
        }
        ConstraintDecl::Enum {
            enum_type,
            accessor,
            whitelist,
            message,
            groups,
        } => {
            let resolved = enums
                .get(&enum_type)
                .ok_or(ConfigError::UnknownEnumType(enum_type))?;
            let mut descriptor =
                ConstraintDescriptor::one_of(Arc::clone(resolved)).whitelist(whitelist);
            if let Some(accessor) = accessor {
                descriptor = descriptor.accessor_name(accessor);
            }
            (descriptor, message, groups)
        }
        ConstraintDecl::Mobile {
            strict,
            message,
            groups,
        } => (ConstraintDescriptor::mobile().strict(strict), message, groups),
        ConstraintDecl::Pattern {
            regex,
            message,
            groups,
        } => (ConstraintDescriptor::pattern(regex), message, groups),
        ConstraintDecl::Valid { schema } => {
            let nested = earlier
                .iter()
                .rev()
                .find(|s| s.name == schema)
                .ok_or(ConfigError::UnknownSchema(schema))?;
            return Ok(ConstraintDescriptor::new(ConstraintKind::Valid {
                schema: Arc::clone(nested),
            }));
        }
        ConstraintDecl::Custom {
            name,
            params,
            message,
            groups,
        } => {
            let descriptor = params
                .into_iter()
                .fold(ConstraintDescriptor::custom(name), |d, (k, v)| d.param(k, v));
            (descriptor, message, groups)
        }
    };

    let descriptor = match message {
        Some(message) => descriptor.message(message),
        None => descriptor,
    };
    Ok(descriptor.groups(groups.into_iter().map(Group::new)))
}
