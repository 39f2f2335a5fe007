//! Validation error types.
//!
//! [`ErrorKind`] is the closed taxonomy of validation failures. Each kind owns
//! its user-visible message template. [`ValidationError`] pairs a kind with
//! the location it was reported at, [`ErrorCollector`] accumulates errors
//! during a run and [`ValidationErrors`] is the non-empty form used with
//! stillwater's `Validation`.

use std::fmt::{self, Display};

use serde::Serialize;
use stillwater::prelude::*;

use crate::schema::RootCategory;

/// Location reported for errors that concern the request as a whole.
pub const REQUEST_LOCATION: &str = "[Request]";

/// Every way a request can fail validation.
///
/// The `Display` output of each variant is the exact message shown to users.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    /// The schema declares a root category the request does not carry.
    #[error("Request is missing '{category}'")]
    RootMissing { category: RootCategory },

    /// A required field is absent.
    #[error("Missing property '{field}'")]
    MissingField { field: String },

    /// A key is not declared on the type.
    #[error("Unexpected property '{field}'")]
    UnexpectedField { field: String },

    /// The value's shape does not match the declared type. Also used for enum
    /// values that are not strings, with `declared_type` set to `enum`.
    #[error("Property '{field}{index_suffix}' should be type '{declared_type}'")]
    IncorrectType {
        field: String,
        index_suffix: String,
        declared_type: String,
    },

    /// A string is not one of the enum's values.
    #[error("Enum '{field}' must have one of these values '{}'", .values.join(", "))]
    EnumValueNotAllowed { field: String, values: Vec<String> },

    /// A string does not have the configured length.
    #[error("Length of '{field}' is {actual} when it should be {expected}")]
    IllegalLength {
        field: String,
        actual: usize,
        expected: usize,
    },

    /// An array at some depth does not have the configured length.
    #[error("Array length of '{path}' is {actual} when it should be {expected}")]
    IllegalArrayLength {
        path: String,
        actual: usize,
        expected: usize,
    },

    /// A number falls outside the configured inclusive range.
    #[error("Value '{value}' is outside of the range [{min}, {max}]")]
    OutOfRange { value: String, min: f64, max: f64 },

    /// A string does not look like an absolute URL.
    #[error("Value '{value}' is not a valid URL")]
    NotUrl { value: String },

    /// A string lacks the configured prefix.
    #[error("Value '{value}' does not start with '{prefix}'")]
    DoesNotStartWith { value: String, prefix: String },

    /// The sanitizer found an enum value outside the allowed set.
    #[error("Illegal enum value '{value}', acceptable values are '{}'", .values.join(", "))]
    IllegalEnumValue { value: String, values: Vec<String> },
}

impl ErrorKind {
    /// Machine-readable code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::RootMissing { .. } => "root_missing",
            ErrorKind::MissingField { .. } => "missing_field",
            ErrorKind::UnexpectedField { .. } => "unexpected_field",
            ErrorKind::IncorrectType { .. } => "incorrect_type",
            ErrorKind::EnumValueNotAllowed { .. } => "enum_value_not_allowed",
            ErrorKind::IllegalLength { .. } => "illegal_length",
            ErrorKind::IllegalArrayLength { .. } => "illegal_array_length",
            ErrorKind::OutOfRange { .. } => "out_of_range",
            ErrorKind::NotUrl { .. } => "not_url",
            ErrorKind::DoesNotStartWith { .. } => "does_not_start_with",
            ErrorKind::IllegalEnumValue { .. } => "illegal_enum_value",
        }
    }
}

/// A single validation failure and where it happened.
///
/// Serializes as `{"message": ..., "location": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Human-readable description, rendered from the kind.
    pub message: String,
    /// Rendered path of the offending value, or [`REQUEST_LOCATION`].
    pub location: String,
    /// The failure category.
    #[serde(skip)]
    pub kind: ErrorKind,
}

impl ValidationError {
    /// Creates an error at the given location.
    pub fn new(location: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: kind.to_string(),
            location: location.into(),
            kind,
        }
    }

    /// Shorthand for `self.kind.code()`.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Accumulates errors during a single validation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorCollector {
    errors: Vec<ValidationError>,
}

impl ErrorCollector {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error.
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Returns true if anything has been recorded.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns the recorded errors in report order.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Number of recorded errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Appends all errors from `other`, keeping their order.
    pub fn join(&mut self, other: ErrorCollector) {
        self.errors.extend(other.errors);
    }

    /// Consumes the collector.
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

/// A non-empty collection of validation errors.
///
/// This is the failure side of `stillwater::Validation` for callers that want
/// to compose request validation with other accumulating checks.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(NonEmptyVec<ValidationError>);

impl ValidationErrors {
    /// Creates a collection containing a single error.
    pub fn single(error: ValidationError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Creates a collection from a vec, or `None` if it is empty.
    pub fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
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
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Returns the first error.
    pub fn first(&self) -> &ValidationError {
        self.0.head()
    }

    /// Returns all errors reported at `location`.
    pub fn at_location(&self, location: &str) -> Vec<&ValidationError> {
        self.0.iter().filter(|e| e.location == location).collect()
    }

    /// Returns all errors with the given code.
    pub fn with_code(&self, code: &str) -> Vec<&ValidationError> {
        self.0.iter().filter(|e| e.code() == code).collect()
    }

    /// Converts into a plain vec.
    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0.into_vec()
    }
}

impl Semigroup for ValidationErrors {
    fn combine(self, other: Self) -> Self {
        ValidationErrors(self.0.combine(other.0))
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Request failed validation with {} error(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ValidationError>();
    assert_sync::<ValidationError>();
    assert_send::<ValidationErrors>();
    assert_sync::<ValidationErrors>();
};

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_root_missing_message() {
        let kind = ErrorKind::RootMissing {
            category: RootCategory::Body,
        };
        assert_eq!(kind.to_string(), "Request is missing 'body'");
        assert_eq!(kind.code(), "root_missing");
    }

    #[test]
    fn test_field_messages() {
        assert_eq!(
            ErrorKind::MissingField { field: "id".into() }.to_string(),
            "Missing property 'id'"
        );
        assert_eq!(
            ErrorKind::UnexpectedField { field: "x".into() }.to_string(),
            "Unexpected property 'x'"
        );
    }

    #[test]
    fn test_incorrect_type_message_includes_suffix() {
        let kind = ErrorKind::IncorrectType {
            field: "bar".into(),
            index_suffix: "[0][0]".into(),
            declared_type: "string".into(),
        };
        assert_eq!(kind.to_string(), "Property 'bar[0][0]' should be type 'string'");
    }

    #[test]
    fn test_enum_messages_join_values() {
        let not_allowed = ErrorKind::EnumValueNotAllowed {
            field: "bar".into(),
            values: strings(&["A", "B"]),
        };
        assert_eq!(
            not_allowed.to_string(),
            "Enum 'bar' must have one of these values 'A, B'"
        );

        let illegal = ErrorKind::IllegalEnumValue {
            value: "C".into(),
            values: strings(&["A", "B"]),
        };
        assert_eq!(
            illegal.to_string(),
            "Illegal enum value 'C', acceptable values are 'A, B'"
        );
    }

    #[test]
    fn test_sanitizer_messages() {
        assert_eq!(
            ErrorKind::IllegalLength {
                field: "foo".into(),
                actual: 2,
                expected: 1
            }
            .to_string(),
            "Length of 'foo' is 2 when it should be 1"
        );
        assert_eq!(
            ErrorKind::IllegalArrayLength {
                path: "foo[1]".into(),
                actual: 3,
                expected: 2
            }
            .to_string(),
            "Array length of 'foo[1]' is 3 when it should be 2"
        );
        assert_eq!(
            ErrorKind::OutOfRange {
                value: "11".into(),
                min: 1.0,
                max: 10.0
            }
            .to_string(),
            "Value '11' is outside of the range [1, 10]"
        );
        assert_eq!(
            ErrorKind::NotUrl {
                value: "nope".into()
            }
            .to_string(),
            "Value 'nope' is not a valid URL"
        );
        assert_eq!(
            ErrorKind::DoesNotStartWith {
                value: "abc".into(),
                prefix: "x-".into()
            }
            .to_string(),
            "Value 'abc' does not start with 'x-'"
        );
    }

    #[test]
    fn test_validation_error_renders_kind() {
        let error = ValidationError::new(
            "body.foo",
            ErrorKind::MissingField { field: "foo".into() },
        );
        assert_eq!(error.message, "Missing property 'foo'");
        assert_eq!(error.code(), "missing_field");
        assert_eq!(error.to_string(), "body.foo: Missing property 'foo'");
    }

    #[test]
    fn test_validation_error_serializes_message_and_location() {
        let error = ValidationError::new(
            REQUEST_LOCATION,
            ErrorKind::RootMissing {
                category: RootCategory::Query,
            },
        );
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "message": "Request is missing 'query'",
                "location": "[Request]"
            })
        );
    }

    #[test]
    fn test_collector_join_preserves_order() {
        let mut first = ErrorCollector::new();
        first.push(ValidationError::new(
            "a",
            ErrorKind::MissingField { field: "a".into() },
        ));
        let mut second = ErrorCollector::new();
        second.push(ValidationError::new(
            "b",
            ErrorKind::MissingField { field: "b".into() },
        ));

        first.join(second);
        assert!(first.has_errors());
        let locations: Vec<_> = first.errors().iter().map(|e| e.location.as_str()).collect();
        assert_eq!(locations, vec!["a", "b"]);
    }

    #[test]
    fn test_validation_errors_from_empty_vec() {
        assert!(ValidationErrors::from_vec(Vec::new()).is_none());
    }

    #[test]
    fn test_validation_errors_combine() {
        let a = ValidationErrors::single(ValidationError::new(
            "body.a",
            ErrorKind::MissingField { field: "a".into() },
        ));
        let b = ValidationErrors::single(ValidationError::new(
            "body.b",
            ErrorKind::UnexpectedField { field: "b".into() },
        ));

        let combined = a.combine(b);
        assert_eq!(combined.len(), 2);
        assert_eq!(combined.first().location, "body.a");
        assert_eq!(combined.with_code("unexpected_field").len(), 1);
        assert_eq!(combined.at_location("body.b").len(), 1);
        assert!(combined.to_string().contains("2 error(s)"));
    }
}
