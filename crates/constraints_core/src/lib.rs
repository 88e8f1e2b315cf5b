//! # Constraints Core
//!
//! Core data structures and types for the Declarative Constraints Engine.
//!
//! This crate provides the building blocks the validation engine consumes:
//! constraint declarations attached to the fields of a type, the runtime
//! values read from an instance, and the results handed back to callers.
//!
//! ## Key Concepts
//!
//! - **Schema**: the declared fields of one type, in declaration order
//! - **ConstraintDescriptor**: one constraint on one field (kind, message, groups)
//! - **Group**: a tag selecting which constraints take part in a validation call
//! - **EnumType**: the variants an enum-membership constraint resolves against
//! - **ValidationReport**: the ordered violations of one validation call
//!
//! ## Example
//!
//! ```rust
//! use constraints_core::{
//!     ConstraintDescriptor, EnumType, EnumVariant, FieldBuilder, Group, SchemaBuilder,
//! };
//!
//! let sex = EnumType::new("Sex")
//!     .variant(EnumVariant::new("MAN").with_code("man"))
//!     .variant(EnumVariant::new("FEMALE").with_code("female"))
//!     .variant(EnumVariant::new("FREAK").with_code("freak"));
//!
//! let schema = SchemaBuilder::new("Account")
//!     .field(
//!         FieldBuilder::new("id")
//!             .constraint(ConstraintDescriptor::not_null().in_group(Group::named("update")))
//!             .build(),
//!     )
//!     .field(
//!         FieldBuilder::new("sex")
//!             .constraint(
//!                 ConstraintDescriptor::one_of(sex)
//!                     .whitelist(["man", "female"])
//!                     .message("sex can only be man or female"),
//!             )
//!             .build(),
//!     )
//!     .build();
//!
//! assert_eq!(schema.fields.len(), 2);
//! ```

pub mod builder;
pub mod constraint;
pub mod enumeration;
pub mod error;
pub mod group;
pub mod validator;
pub mod value;

pub use builder::*;
pub use constraint::*;
pub use enumeration::*;
pub use error::*;
pub use group::*;
pub use validator::*;
pub use value::*;
