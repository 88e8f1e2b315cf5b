//! Builder pattern for declaring schemas.
//!
//! This module provides ergonomic builders for constructing schemas
//! and their fields with a fluent API.

use crate::{ConstraintDescriptor, FieldSpec, FieldType, Schema};

/// Builder for creating a `Schema`.
///
/// # Example
///
/// ```rust
/// use constraints_core::{ConstraintDescriptor, FieldBuilder, SchemaBuilder};
///
/// let address = SchemaBuilder::new("Address")
///     .field(
///         FieldBuilder::new("addressInfo")
///             .constraint(ConstraintDescriptor::not_empty().message("address info is required"))
///             .build(),
///     )
///     .build();
///
/// let account = SchemaBuilder::new("Account")
///     .field(FieldBuilder::new("id").not_null().build())
///     .field(FieldBuilder::new("address").not_null().valid(address).build())
///     .build();
///
/// assert_eq!(account.fields.len(), 2);
/// assert_eq!(account.fields[1].constraints.len(), 2);
/// ```
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    /// Creates a new schema builder for the named type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a field. Declaration order is validation order.
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds multiple fields.
    pub fn fields(mut self, fields: Vec<FieldSpec>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Builds the schema.
    pub fn build(self) -> Schema {
        Schema {
            name: self.name,
            fields: self.fields,
        }
    }
}

/// Builder for creating a `FieldSpec`.
///
/// # Example
///
/// ```rust
/// use constraints_core::{ConstraintDescriptor, FieldBuilder, FieldType};
///
/// let field = FieldBuilder::new("mobile")
///     .field_type(FieldType::String)
///     .constraint(ConstraintDescriptor::mobile().strict(false))
///     .build();
///
/// assert_eq!(field.name, "mobile");
/// ```
#[derive(Debug)]
pub struct FieldBuilder {
    name: String,
    field_type: Option<FieldType>,
    constraints: Vec<ConstraintDescriptor>,
}

impl FieldBuilder {
    /// Creates a new field builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: None,
            constraints: Vec::new(),
        }
    }

    /// Sets the declared field type.
    pub fn field_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    /// Adds a constraint.
    pub fn constraint(mut self, constraint: ConstraintDescriptor) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Adds a not-null constraint with the default message.
    pub fn not_null(self) -> Self {
        self.constraint(ConstraintDescriptor::not_null())
    }

    /// Adds a not-empty constraint with the default message.
    pub fn not_empty(self) -> Self {
        self.constraint(ConstraintDescriptor::not_empty())
    }

    /// Marks the field for nested validation against `schema`.
    pub fn valid(self, schema: Schema) -> Self {
        self.constraint(ConstraintDescriptor::valid(schema))
    }

    /// Builds the field.
    pub fn build(self) -> FieldSpec {
        FieldSpec {
            name: self.name,
            field_type: self.field_type,
            constraints: self.constraints,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConstraintKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_builder() {
        let field = FieldBuilder::new("username")
            .field_type(FieldType::String)
            .not_empty()
            .build();

        assert_eq!(field.name, "username");
        assert_eq!(field.field_type, Some(FieldType::String));
        assert_eq!(field.constraints.len(), 1);
        assert_eq!(field.constraints[0].kind, ConstraintKind::NotEmpty);
    }

    #[test]
    fn test_schema_builder_preserves_order() {
        let schema = SchemaBuilder::new("Account")
            .field(FieldBuilder::new("id").build())
            .fields(vec![
                FieldBuilder::new("username").build(),
                FieldBuilder::new("address").build(),
            ])
            .build();

        let names: Vec<&str> = schema.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "username", "address"]);
        assert!(schema.field("username").is_some());
        assert!(schema.field("email").is_none());
    }
}
