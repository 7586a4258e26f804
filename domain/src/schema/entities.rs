//! Schema descriptors
//!
//! An [`ObjectSchema`] is an ordered list of [`FieldSchema`]s. Each field has a
//! [`FieldKind`] that carries its constraints, so one generic validator can
//! check any capability payload without per-capability code.

use serde::{Deserialize, Serialize};

/// Shape and constraints of a single field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    /// UTF-8 text. `min_length` counts characters of the trimmed value.
    String {
        #[serde(skip_serializing_if = "Option::is_none")]
        min_length: Option<usize>,
    },
    /// Any JSON number. `positive` requires a value strictly greater than zero.
    Number { positive: bool },
    /// A string drawn from a closed set of values
    Enum { values: Vec<String> },
    /// Homogeneous list
    List { items: Box<FieldKind> },
    /// Nested record
    Object { schema: ObjectSchema },
}

impl FieldKind {
    /// Plain string with no length constraint
    pub fn string() -> Self {
        FieldKind::String { min_length: None }
    }

    /// String that must carry at least `min` characters once trimmed
    pub fn text(min: usize) -> Self {
        FieldKind::String {
            min_length: Some(min),
        }
    }

    pub fn number() -> Self {
        FieldKind::Number { positive: false }
    }

    pub fn positive_number() -> Self {
        FieldKind::Number { positive: true }
    }

    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldKind::Enum {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn list_of(items: FieldKind) -> Self {
        FieldKind::List {
            items: Box::new(items),
        }
    }

    pub fn object(schema: ObjectSchema) -> Self {
        FieldKind::Object { schema }
    }

    /// Short type label used in error messages
    pub fn type_label(&self) -> &'static str {
        match self {
            FieldKind::String { .. } => "string",
            FieldKind::Number { .. } => "number",
            FieldKind::Enum { .. } => "string",
            FieldKind::List { .. } => "list",
            FieldKind::Object { .. } => "object",
        }
    }
}

/// A named field inside an [`ObjectSchema`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    pub description: String,
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldSchema {
    /// A required field
    pub fn required(name: impl Into<String>, description: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required: true,
            kind,
        }
    }

    /// An optional field; `null` is treated the same as absent
    pub fn optional(name: impl Into<String>, description: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required: false,
            kind,
        }
    }
}

/// Record shape: the exact set of accepted fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectSchema {
    fields: Vec<FieldSchema>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add a field (builder pattern). A later field with the same name replaces
    /// the earlier one.
    pub fn with_field(mut self, field: FieldSchema) -> Self {
        self.fields.retain(|f| f.name != field.name);
        self.fields.push(field);
        self
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}
