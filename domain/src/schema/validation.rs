//! Generic payload validation
//!
//! [`validate`] walks a JSON value against an [`ObjectSchema`] and reports the
//! first violation it meets, with a dotted path to the offending field
//! (`risks[2].severity`).

use super::entities::{FieldKind, ObjectSchema};
use serde_json::{Map, Value};
use thiserror::Error;

/// A payload that does not satisfy its schema
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    #[error("expected an object at `{path}`")]
    NotAnObject { path: String },

    #[error("missing required field `{path}`")]
    MissingField { path: String },

    #[error("unexpected field `{path}`")]
    UnknownField { path: String },

    #[error("`{path}` must be a {expected}")]
    WrongType { path: String, expected: &'static str },

    #[error("`{path}` must be at least {min} characters")]
    TooShort { path: String, min: usize },

    #[error("`{path}` must be a positive number")]
    NotPositive { path: String },

    #[error("`{path}` must be one of: {allowed}")]
    NotInSet { path: String, allowed: String },
}

impl SchemaViolation {
    /// Path of the offending field
    pub fn path(&self) -> &str {
        match self {
            SchemaViolation::NotAnObject { path }
            | SchemaViolation::MissingField { path }
            | SchemaViolation::UnknownField { path }
            | SchemaViolation::WrongType { path, .. }
            | SchemaViolation::TooShort { path, .. }
            | SchemaViolation::NotPositive { path }
            | SchemaViolation::NotInSet { path, .. } => path,
        }
    }
}

/// Validate `value` against `schema`.
///
/// The root must be an object. Fields not declared in the schema are
/// rejected; optional fields may be absent or `null`.
pub fn validate(schema: &ObjectSchema, value: &Value) -> Result<(), SchemaViolation> {
    validate_object(schema, value, "")
}

fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

fn validate_object(schema: &ObjectSchema, value: &Value, path: &str) -> Result<(), SchemaViolation> {
    let map: &Map<String, Value> = value.as_object().ok_or_else(|| SchemaViolation::NotAnObject {
        path: if path.is_empty() { "$".to_string() } else { path.to_string() },
    })?;

    if let Some(unknown) = map.keys().find(|k| schema.field(k).is_none()) {
        return Err(SchemaViolation::UnknownField {
            path: join(path, unknown),
        });
    }

    for field in schema.fields() {
        let field_path = join(path, &field.name);
        match map.get(&field.name) {
            None | Some(Value::Null) => {
                if field.required {
                    return Err(SchemaViolation::MissingField { path: field_path });
                }
            }
            Some(v) => validate_kind(&field.kind, v, &field_path)?,
        }
    }

    Ok(())
}

fn validate_kind(kind: &FieldKind, value: &Value, path: &str) -> Result<(), SchemaViolation> {
    match kind {
        FieldKind::String { min_length } => {
            let s = value.as_str().ok_or_else(|| wrong_type(kind, path))?;
            if let Some(min) = min_length
                && s.trim().chars().count() < *min
            {
                return Err(SchemaViolation::TooShort {
                    path: path.to_string(),
                    min: *min,
                });
            }
            Ok(())
        }
        FieldKind::Number { positive } => {
            let n = value.as_f64().ok_or_else(|| wrong_type(kind, path))?;
            if *positive && n <= 0.0 {
                return Err(SchemaViolation::NotPositive {
                    path: path.to_string(),
                });
            }
            Ok(())
        }
        FieldKind::Enum { values } => {
            let s = value.as_str().ok_or_else(|| wrong_type(kind, path))?;
            if values.iter().any(|allowed| allowed == s) {
                Ok(())
            } else {
                Err(SchemaViolation::NotInSet {
                    path: path.to_string(),
                    allowed: values.join(", "),
                })
            }
        }
        FieldKind::List { items } => {
            let list = value.as_array().ok_or_else(|| wrong_type(kind, path))?;
            for (i, item) in list.iter().enumerate() {
                validate_kind(items, item, &format!("{}[{}]", path, i))?;
            }
            Ok(())
        }
        FieldKind::Object { schema } => validate_object(schema, value, path),
    }
}

fn wrong_type(kind: &FieldKind, path: &str) -> SchemaViolation {
    SchemaViolation::WrongType {
        path: path.to_string(),
        expected: kind.type_label(),
    }
}
