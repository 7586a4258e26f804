//! JSON Schema export
//!
//! Converts an [`ObjectSchema`] into a provider-neutral JSON Schema document.
//! Model adapters use this to constrain structured output.

use super::entities::{FieldKind, ObjectSchema};
use serde_json::{Map, Value, json};

impl ObjectSchema {
    /// Render this schema as a JSON Schema `object` definition.
    ///
    /// Mapping:
    /// - `String` → `{"type": "string", "minLength": n}`
    /// - `Number` → `{"type": "number", "exclusiveMinimum": 0}` when positive
    /// - `Enum` → `{"type": "string", "enum": [...]}`
    /// - `List` → `{"type": "array", "items": ...}`
    /// - `Object` → nested object definition
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in self.fields() {
            let mut prop = kind_to_json_schema(&field.kind);
            if let Value::Object(ref mut map) = prop {
                map.insert("description".to_string(), json!(field.description));
            }
            properties.insert(field.name.clone(), prop);
            if field.required {
                required.push(json!(field.name));
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

fn kind_to_json_schema(kind: &FieldKind) -> Value {
    match kind {
        FieldKind::String { min_length } => match min_length {
            Some(min) => json!({"type": "string", "minLength": min}),
            None => json!({"type": "string"}),
        },
        FieldKind::Number { positive } => {
            if *positive {
                json!({"type": "number", "exclusiveMinimum": 0})
            } else {
                json!({"type": "number"})
            }
        }
        FieldKind::Enum { values } => json!({"type": "string", "enum": values}),
        FieldKind::List { items } => json!({"type": "array", "items": kind_to_json_schema(items)}),
        FieldKind::Object { schema } => schema.to_json_schema(),
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::entities::{FieldKind, FieldSchema, ObjectSchema};

    #[test]
    fn test_flat_schema() {
        let schema = ObjectSchema::new()
            .with_field(FieldSchema::required("question", "What to ask", FieldKind::text(1)))
            .with_field(FieldSchema::optional("context", "Extra context", FieldKind::string()));

        let json = schema.to_json_schema();
        assert_eq!(json["type"], "object");
        assert_eq!(json["properties"]["question"]["type"], "string");
        assert_eq!(json["properties"]["question"]["minLength"], 1);
        assert_eq!(json["properties"]["question"]["description"], "What to ask");
        assert!(json["properties"]["context"].get("minLength").is_none());

        let required = json["required"].as_array().unwrap();
        assert_eq!(required.len(), 1);
        assert_eq!(required[0], "question");
    }

    #[test]
    fn test_nested_list_of_objects() {
        let item = ObjectSchema::new().with_field(FieldSchema::required(
            "severity",
            "level",
            FieldKind::one_of(["High", "Medium", "Low"]),
        ));
        let schema = ObjectSchema::new().with_field(FieldSchema::required(
            "risks",
            "list",
            FieldKind::list_of(FieldKind::object(item)),
        ));

        let json = schema.to_json_schema();
        let items = &json["properties"]["risks"]["items"];
        assert_eq!(json["properties"]["risks"]["type"], "array");
        assert_eq!(items["type"], "object");
        assert_eq!(items["properties"]["severity"]["enum"][2], "Low");
    }

    #[test]
    fn test_positive_number_bound() {
        let schema = ObjectSchema::new().with_field(FieldSchema::required(
            "paymentAmount",
            "amount",
            FieldKind::positive_number(),
        ));
        let json = schema.to_json_schema();
        assert_eq!(json["properties"]["paymentAmount"]["exclusiveMinimum"], 0);
    }
}
