//! # Constraints Validator
//!
//! Validation engine for declarative field constraints. This crate turns the
//! declarations of `constraints_core` into initialized validators and runs
//! them against instances:
//!
//! - Enum membership with accessor-derived codes and whitelists
//! - Mobile-number and regex pattern formats
//! - Presence checks (not-null, not-empty)
//! - Group filtering and nested-object descent
//! - Collect mode (full report) and assert mode (first violation as error)
//!
//! ## Example
//!
//! ```rust
//! use constraints_core::{ConstraintDescriptor, FieldBuilder, Group, Record, SchemaBuilder};
//! use constraints_validator::ValidationEngine;
//!
//! let schema = SchemaBuilder::new("Account")
//!     .field(
//!         FieldBuilder::new("id")
//!             .constraint(ConstraintDescriptor::not_null().in_group(Group::named("update")))
//!             .build(),
//!     )
//!     .field(
//!         FieldBuilder::new("mobile")
//!             .constraint(ConstraintDescriptor::mobile().strict(false))
//!             .build(),
//!     )
//!     .build();
//!
//! let engine = ValidationEngine::new();
//! let compiled = engine.compile(&schema).unwrap();
//! let record = Record::new().with("mobile", "10000000000");
//!
//! let report = engine.validate_with(&compiled, &record, &[]).unwrap();
//! assert!(report.is_valid());
//!
//! let report = engine
//!     .validate_with(&compiled, &record, &[Group::named("update")])
//!     .unwrap();
//! assert_eq!(report.errors_summary(), "id:must not be null ");
//! ```

mod aggregate;
mod cache;
mod engine;
mod enum_validator;
mod format;
mod groups;
mod presence;
mod registry;
mod schema;

pub use aggregate::*;
pub use cache::*;
pub use engine::*;
pub use enum_validator::*;
pub use format::*;
pub use groups::*;
pub use presence::*;
pub use registry::*;
pub use schema::*;
