//! Schema construction error types.
//!
//! A schema is checked as a whole before it can be used. Every problem found
//! is reported as a [`SchemaError`] and the set of them as [`SchemaErrors`].

use std::fmt::{self, Display};

use stillwater::prelude::*;

/// A problem with a schema definition.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    /// A field refers to a type that is neither built in nor declared.
    #[error("field '{owner}.{field}' references unknown type '{type_name}'")]
    UnknownType {
        owner: String,
        field: String,
        type_name: String,
    },

    /// A field's type string is not well formed (e.g. `array[string`).
    #[error("field '{owner}.{field}' has malformed type '{type_name}'")]
    MalformedType {
        owner: String,
        field: String,
        type_name: String,
    },

    /// An enum field has no allowed values.
    #[error("enum field '{owner}.{field}' must declare at least one value")]
    MissingEnumValues { owner: String, field: String },

    /// A range whose lower bound exceeds its upper bound.
    #[error("field '{owner}.{field}' has an empty range [{min}, {max}]")]
    InvalidRange {
        owner: String,
        field: String,
        min: f64,
        max: f64,
    },

    /// A declared type name collides with a built-in type keyword.
    #[error("type name '{0}' is reserved")]
    ReservedTypeName(String),

    /// The declarative source could not be decoded.
    #[error("invalid schema definition: {0}")]
    Decode(String),
}

impl SchemaError {
    /// Machine-readable code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::UnknownType { .. } => "unknown_type",
            SchemaError::MalformedType { .. } => "malformed_type",
            SchemaError::MissingEnumValues { .. } => "missing_enum_values",
            SchemaError::InvalidRange { .. } => "invalid_range",
            SchemaError::ReservedTypeName(_) => "reserved_type_name",
            SchemaError::Decode(_) => "decode",
        }
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        SchemaError::Decode(err.to_string())
    }
}

/// A non-empty collection of schema construction errors.
///
/// `SchemaErrors` implements `Semigroup`, so the checks for separate types and
/// fields can each produce their own errors and be combined:
///
/// ```rust
/// use reqschema::{SchemaError, SchemaErrors};
/// use stillwater::prelude::*;
///
/// let a = SchemaErrors::single(SchemaError::ReservedTypeName("string".into()));
/// let b = SchemaErrors::single(SchemaError::ReservedTypeName("enum".into()));
/// assert_eq!(a.combine(b).len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaErrors(NonEmptyVec<SchemaError>);

impl SchemaErrors {
    /// Creates a collection containing a single error.
    pub fn single(error: SchemaError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Creates a collection from a vec, or `None` if it is empty.
    pub fn from_vec(errors: Vec<SchemaError>) -> Option<Self> {
        NonEmptyVec::from_vec(errors).map(Self)
    }

    /// Returns the number of errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the errors.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaError> {
        self.0.iter()
    }

    /// Returns the first error.
    pub fn first(&self) -> &SchemaError {
        self.0.head()
    }

    /// Returns all errors with the given code.
    pub fn with_code(&self, code: &str) -> Vec<&SchemaError> {
        self.0.iter().filter(|e| e.code() == code).collect()
    }

    /// Converts into a plain vec.
    pub fn into_vec(self) -> Vec<SchemaError> {
        self.0.into_vec()
    }
}

impl Semigroup for SchemaErrors {
    fn combine(self, other: Self) -> Self {
        SchemaErrors(self.0.combine(other.0))
    }
}

impl Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Schema is invalid ({} error(s)):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaErrors {}

impl From<SchemaError> for SchemaErrors {
    fn from(error: SchemaError) -> Self {
        SchemaErrors::single(error)
    }
}

impl IntoIterator for SchemaErrors {
    type Item = SchemaError;
    type IntoIter = std::vec::IntoIter<SchemaError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_type_message() {
        let error = SchemaError::UnknownType {
            owner: "body".into(),
            field: "user".into(),
            type_name: "User".into(),
        };
        assert_eq!(
            error.to_string(),
            "field 'body.user' references unknown type 'User'"
        );
        assert_eq!(error.code(), "unknown_type");
    }

    #[test]
    fn test_decode_from_serde_error() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = SchemaError::from(err);
        assert_eq!(error.code(), "decode");
    }

    #[test]
    fn test_display_lists_every_error() {
        let errors = SchemaErrors::single(SchemaError::ReservedTypeName("any".into()))
            .combine(SchemaErrors::single(SchemaError::MissingEnumValues {
                owner: "query".into(),
                field: "sort".into(),
            }));
        let display = errors.to_string();
        assert!(display.contains("2 error(s)"));
        assert!(display.contains("type name 'any' is reserved"));
        assert!(display.contains("enum field 'query.sort'"));
    }

    #[test]
    fn test_from_vec_empty_is_none() {
        assert!(SchemaErrors::from_vec(Vec::new()).is_none());
    }
}
