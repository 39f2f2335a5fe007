//! Declarative schema definitions.
//!
//! A [`SchemaDefinition`] is the unchecked, serializable form of a schema. It
//! can be decoded from JSON:
//!
//! ```json
//! {
//!   "types": {
//!     "body": {
//!       "user": { "type": "User", "required": true },
//!       "tags": { "type": "array[string]", "required": false, "arrayLengths": [3] }
//!     },
//!     "User": {
//!       "name": { "type": "string", "required": true, "length": 8 },
//!       "role": { "type": "enum", "required": true, "values": ["admin", "member"] }
//!     }
//!   }
//! }
//! ```
//!
//! or assembled in code with the builder methods. Either way it is turned
//! into a usable [`Schema`](super::Schema) with
//! [`Schema::from_definition`](super::Schema::from_definition), which checks
//! it as a whole.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::SchemaErrors;

use super::Schema;

/// The declared contract of one field, before resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FieldDefinition {
    /// Type string: `string`, `number`, `boolean`, `enum`, `any`,
    /// `array[...]` or the name of a declared type.
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
    /// Inclusive `[min, max]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    #[serde(default, rename = "isURL", alias = "isUrl")]
    pub is_url: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_with: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_lengths: Option<Vec<usize>>,
}

impl FieldDefinition {
    /// Creates an optional field of the given type with no constraints.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            required: false,
            values: None,
            range: None,
            is_url: false,
            starts_with: None,
            length: None,
            array_lengths: None,
        }
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the allowed enum values.
    pub fn values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Sets an inclusive numeric range.
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = Some([min, max]);
        self
    }

    /// Requires string values to be absolute URLs.
    pub fn url(mut self) -> Self {
        self.is_url = true;
        self
    }

    /// Requires string values to start with `prefix`.
    pub fn starts_with(mut self, prefix: impl Into<String>) -> Self {
        self.starts_with = Some(prefix.into());
        self
    }

    /// Requires string values to have exactly `length` characters.
    pub fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    /// Sets the exact expected length at each array depth.
    pub fn array_lengths(mut self, lengths: impl IntoIterator<Item = usize>) -> Self {
        self.array_lengths = Some(lengths.into_iter().collect());
        self
    }
}

/// The fields of one named type, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeDefinition {
    pub fields: IndexMap<String, FieldDefinition>,
}

impl TypeDefinition {
    /// Creates a type with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, replacing any earlier field of the same name.
    pub fn field(mut self, name: impl Into<String>, field: FieldDefinition) -> Self {
        self.fields.insert(name.into(), field);
        self
    }
}

/// All named types of a schema, including the root categories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    #[serde(default)]
    pub types: IndexMap<String, TypeDefinition>,
}

impl SchemaDefinition {
    /// Creates an empty definition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named type, replacing any earlier type of the same name.
    pub fn with_type(mut self, name: impl Into<String>, definition: TypeDefinition) -> Self {
        self.types.insert(name.into(), definition);
        self
    }

    /// Checks and resolves the definition.
    ///
    /// Shorthand for [`Schema::from_definition`].
    pub fn build(self) -> Result<Schema, SchemaErrors> {
        Schema::from_definition(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_field_attributes() {
        let field: FieldDefinition = serde_json::from_value(json!({
            "type": "string",
            "required": true,
            "isURL": true,
            "startsWith": "https://",
            "length": 20
        }))
        .unwrap();

        assert_eq!(field.type_name, "string");
        assert!(field.required);
        assert!(field.is_url);
        assert_eq!(field.starts_with.as_deref(), Some("https://"));
        assert_eq!(field.length, Some(20));
    }

    #[test]
    fn test_decode_defaults() {
        let field: FieldDefinition = serde_json::from_value(json!({"type": "number"})).unwrap();
        assert_eq!(field, FieldDefinition::new("number"));
    }

    #[test]
    fn test_decode_range_and_array_lengths() {
        let field: FieldDefinition = serde_json::from_value(json!({
            "type": "array[number]",
            "range": [0, 10],
            "arrayLengths": [2]
        }))
        .unwrap();
        assert_eq!(field.range, Some([0.0, 10.0]));
        assert_eq!(field.array_lengths, Some(vec![2]));
    }

    #[test]
    fn test_unknown_attribute_is_rejected() {
        let result: Result<FieldDefinition, _> =
            serde_json::from_value(json!({"type": "string", "requried": true}));
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_preserves_field_order() {
        let definition: SchemaDefinition = serde_json::from_str(
            r#"{"types": {"body": {"z": {"type": "string"}, "a": {"type": "string"}}}}"#,
        )
        .unwrap();
        let names: Vec<_> = definition.types["body"].fields.keys().cloned().collect();
        assert_eq!(names, vec!["z", "a"]);
    }

    #[test]
    fn test_builder_matches_decoded() {
        let built = SchemaDefinition::new().with_type(
            "query",
            TypeDefinition::new().field(
                "sort",
                FieldDefinition::new("enum").required().values(["asc", "desc"]),
            ),
        );
        let decoded: SchemaDefinition = serde_json::from_value(json!({
            "types": {
                "query": {
                    "sort": {"type": "enum", "required": true, "values": ["asc", "desc"]}
                }
            }
        }))
        .unwrap();
        assert_eq!(built, decoded);
    }
}
