//! Resolved field types and per-field configuration.

use std::fmt::{self, Display};

use serde_json::Value;

/// Scalar types a field can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    String,
    Number,
    Boolean,
}

impl Primitive {
    /// Returns the keyword used in type strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Number => "number",
            Primitive::Boolean => "boolean",
        }
    }

    /// Returns true if `value` has this primitive's dynamic type.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Primitive::String => value.is_string(),
            Primitive::Number => value.is_number(),
            Primitive::Boolean => value.is_boolean(),
        }
    }
}

/// A field's declared type, parsed once from its type string.
///
/// `Display` renders the canonical type string, e.g. `array[array[string]]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Accepts any value without looking inside it.
    Any,
    Primitive(Primitive),
    /// A string restricted to the field's `values`.
    Enum,
    /// An array whose elements have the wrapped type.
    Array(Box<FieldType>),
    /// Another type declared in the same schema.
    Named(String),
}

/// Keywords that cannot be used as declared type names.
pub(crate) const RESERVED_TYPE_NAMES: &[&str] =
    &["any", "enum", "string", "number", "boolean", "array"];

const ARRAY_OPEN: &str = "array[";

/// A type string that does not follow the type grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MalformedType;

impl FieldType {
    /// Parses a type string. Named types are not checked for existence here.
    pub(crate) fn parse(raw: &str) -> Result<Self, MalformedType> {
        let raw = raw.trim();
        match raw {
            "any" => return Ok(FieldType::Any),
            "string" => return Ok(FieldType::Primitive(Primitive::String)),
            "number" => return Ok(FieldType::Primitive(Primitive::Number)),
            "boolean" => return Ok(FieldType::Primitive(Primitive::Boolean)),
            "enum" => return Ok(FieldType::Enum),
            _ => {}
        }

        if let Some(rest) = raw.strip_prefix(ARRAY_OPEN) {
            let inner = rest.strip_suffix(']').ok_or(MalformedType)?;
            if inner.trim().is_empty() {
                return Err(MalformedType);
            }
            return Ok(FieldType::Array(Box::new(FieldType::parse(inner)?)));
        }

        if raw.is_empty() || raw == "array" || raw.contains(['[', ']']) {
            return Err(MalformedType);
        }
        Ok(FieldType::Named(raw.to_string()))
    }

    /// Returns true for `array[...]` types.
    pub fn is_array(&self) -> bool {
        matches!(self, FieldType::Array(_))
    }

    /// Returns true for the `enum` type.
    pub fn is_enum(&self) -> bool {
        matches!(self, FieldType::Enum)
    }

    /// Returns true for `string`, `number` and `boolean`.
    pub fn is_primitive(&self) -> bool {
        matches!(self, FieldType::Primitive(_))
    }

    /// Returns the element type one array level down.
    pub fn element_type(&self) -> Option<&FieldType> {
        match self {
            FieldType::Array(inner) => Some(inner),
            _ => None,
        }
    }

    /// Returns the type left after removing every `array[` wrapper.
    pub fn innermost(&self) -> &FieldType {
        match self {
            FieldType::Array(inner) => inner.innermost(),
            other => other,
        }
    }

    /// Number of `array[` wrappers.
    pub fn array_depth(&self) -> usize {
        match self {
            FieldType::Array(inner) => 1 + inner.array_depth(),
            _ => 0,
        }
    }

    /// Returns the declared type this type refers to, if any.
    pub fn referenced_type(&self) -> Option<&str> {
        match self.innermost() {
            FieldType::Named(name) => Some(name),
            _ => None,
        }
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Any => f.write_str("any"),
            FieldType::Primitive(p) => f.write_str(p.as_str()),
            FieldType::Enum => f.write_str("enum"),
            FieldType::Array(inner) => write!(f, "{}{}]", ARRAY_OPEN, inner),
            FieldType::Named(name) => f.write_str(name),
        }
    }
}

/// Inclusive numeric bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    /// Returns true if `value` lies within the bounds.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// The validated contract for one field of a type.
///
/// Constraints only take effect for the base type they belong to: `length`,
/// `starts_with` and `is_url` for strings, `range` for numbers, `values` for
/// enums and `array_lengths` for arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    pub(crate) field_type: FieldType,
    pub(crate) required: bool,
    pub(crate) values: Option<Vec<String>>,
    pub(crate) range: Option<NumericRange>,
    pub(crate) is_url: bool,
    pub(crate) starts_with: Option<String>,
    pub(crate) length: Option<usize>,
    pub(crate) array_lengths: Vec<usize>,
}

impl FieldConfig {
    pub(crate) fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            values: None,
            range: None,
            is_url: false,
            starts_with: None,
            length: None,
            array_lengths: Vec::new(),
        }
    }

    /// Derives the configuration of this array's elements.
    ///
    /// The element keeps every constraint of the array; only the type loses
    /// one `array[` wrapper. Returns `None` if this is not an array field.
    pub fn element(&self) -> Option<FieldConfig> {
        let element_type = self.field_type.element_type()?;
        Some(Self {
            field_type: element_type.clone(),
            required: false,
            ..self.clone()
        })
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn values(&self) -> Option<&[String]> {
        self.values.as_deref()
    }

    pub fn range(&self) -> Option<NumericRange> {
        self.range
    }

    pub fn is_url(&self) -> bool {
        self.is_url
    }

    pub fn starts_with(&self) -> Option<&str> {
        self.starts_with.as_deref()
    }

    pub fn length(&self) -> Option<usize> {
        self.length
    }

    pub fn array_lengths(&self) -> &[usize] {
        &self.array_lengths
    }
}
