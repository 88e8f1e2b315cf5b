//! Schema initialization.
//!
//! A [`CompiledSchema`] is the initialized form of a [`Schema`]: every
//! constraint has its validator built, every nested schema is compiled, and
//! every configuration error has been reported. It is immutable afterwards
//! and can be shared across threads.

use crate::{ConstraintValidator, ValidatorRegistry};
use constraints_core::{
    ConfigError, ConfigResult, ConstraintDescriptor, ConstraintKind, FieldSpec, FieldType, Group,
    Schema,
};
use std::sync::Arc;
use tracing::debug;

/// One initialized constraint.
#[derive(Debug)]
pub struct CompiledConstraint {
    /// Constraint tag, e.g. `enum`
    pub tag: String,

    /// Message reported on failure
    pub message: String,

    /// Declared groups; empty means default only
    pub groups: Vec<Group>,

    /// The built validator
    pub validator: Box<dyn ConstraintValidator>,
}

/// One initialized field.
#[derive(Debug)]
pub struct CompiledField {
    /// Field name
    pub name: String,

    /// Constraints in declaration order
    pub constraints: Vec<CompiledConstraint>,

    /// Nested schema present values are validated against
    pub nested: Option<Arc<CompiledSchema>>,
}

/// Initialized schema of one type.
#[derive(Debug)]
pub struct CompiledSchema {
    /// Type name
    pub name: String,

    /// Fields in declaration order
    pub fields: Vec<CompiledField>,
}

impl CompiledSchema {
    /// Initializes `schema` against `registry`.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] raised while building a validator, plus:
    /// - [`ConfigError::DuplicateField`] if a field is declared twice
    /// - [`ConfigError::TypeMismatch`] if a constraint is attached to a field
    ///   whose declared type it cannot handle
    /// - [`ConfigError::InvalidNestedMarker`] if a field carries two `valid`
    ///   markers or a grouped one
    pub fn compile(schema: &Schema, registry: &ValidatorRegistry) -> ConfigResult<Self> {
        schema.check_unique_fields()?;

        let fields = schema
            .fields
            .iter()
            .map(|field| compile_field(field, registry))
            .collect::<ConfigResult<Vec<_>>>()?;

        debug!(
            schema = %schema.name,
            fields = fields.len(),
            constraints = fields.iter().map(|f| f.constraints.len()).sum::<usize>(),
            "Compiled schema"
        );

        Ok(Self {
            name: schema.name.clone(),
            fields,
        })
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&CompiledField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

fn compile_field(field: &FieldSpec, registry: &ValidatorRegistry) -> ConfigResult<CompiledField> {
    let mut constraints = Vec::with_capacity(field.constraints.len());
    let mut nested = None;

    for descriptor in &field.constraints {
        match &descriptor.kind {
            ConstraintKind::Valid { schema } => {
                if nested.is_some() {
                    return Err(ConfigError::InvalidNestedMarker {
                        field: field.name.clone(),
                        reason: "declares more than one nested schema".to_string(),
                    });
                }
                if !descriptor.groups.is_empty() {
                    return Err(ConfigError::InvalidNestedMarker {
                        field: field.name.clone(),
                        reason: "nested validation cannot be restricted to groups".to_string(),
                    });
                }
                if let Some(declared) = &field.field_type {
                    if !matches!(declared, FieldType::Object | FieldType::List) {
                        return Err(ConfigError::type_mismatch(
                            &field.name,
                            "valid",
                            "object or list",
                            declared.to_string(),
                        ));
                    }
                }
                nested = Some(Arc::new(CompiledSchema::compile(schema, registry)?));
            }
            _ => constraints.push(compile_constraint(descriptor, field, registry)?),
        }
    }

    Ok(CompiledField {
        name: field.name.clone(),
        constraints,
        nested,
    })
}

fn compile_constraint(
    descriptor: &ConstraintDescriptor,
    field: &FieldSpec,
    registry: &ValidatorRegistry,
) -> ConfigResult<CompiledConstraint> {
    let validator = registry.create(descriptor, &field.name)?;
    let tag = descriptor.kind.tag().to_string();

    if let Some(declared) = &field.field_type {
        if !validator.accepts(declared) {
            return Err(ConfigError::type_mismatch(
                &field.name,
                tag,
                validator.expected_type(),
                declared.to_string(),
            ));
        }
    }

    Ok(CompiledConstraint {
        tag,
        message: descriptor.message.clone(),
        groups: descriptor.groups.clone(),
        validator,
    })
}
