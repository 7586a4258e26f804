//! Schema contract
//!
//! Introspectable descriptions of capability payloads:
//!
//! - [`entities`] - [`ObjectSchema`], [`FieldSchema`], [`FieldKind`]
//! - [`validation`] - the single generic [`validate`] routine
//! - [`json_schema`] - export to JSON Schema for constrained generation

pub mod entities;
pub mod json_schema;
pub mod validation;

pub use entities::{FieldKind, FieldSchema, ObjectSchema};
pub use validation::{SchemaViolation, validate};
