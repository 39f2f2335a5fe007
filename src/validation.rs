//! Per-run validation state and the public result type.
//!
//! [`ValidationContext`] is threaded explicitly through every recursive check.
//! It carries the current [`Path`] and the errors found so far, and is created
//! fresh for each validation run. [`ValidationResult`] is what a run produces.

use serde::Serialize;
use stillwater::Validation;

use crate::error::{ErrorCollector, ErrorKind, ValidationError, ValidationErrors};
use crate::path::{Path, PathComponent};

/// Path and error state for one validation run.
///
/// Components are pushed with [`with_property`](Self::with_property) and
/// [`with_index`](Self::with_index), which always pop what they push.
/// [`branch`](Self::branch) starts an independent sub-validation at the
/// current location whose errors can later be merged back with
/// [`join`](Self::join).
#[derive(Debug, Clone, Default)]
pub struct ValidationContext {
    path: Path,
    errors: ErrorCollector,
}

impl ValidationContext {
    /// Creates a context at the empty path with no errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The errors reported so far.
    pub fn errors(&self) -> &ErrorCollector {
        &self.errors
    }

    /// Reports an error at the current location.
    pub fn report(&mut self, kind: ErrorKind) {
        let location = self.path.to_string();
        self.errors.push(ValidationError::new(location, kind));
    }

    /// Reports an error at an explicit location.
    pub fn report_at(&mut self, location: impl Into<String>, kind: ErrorKind) {
        self.errors.push(ValidationError::new(location, kind));
    }

    /// Rendered trailing index components, e.g. `[0][1]`.
    pub fn index_suffix(&self) -> String {
        self.path.current_index_suffix().to_string()
    }

    /// Runs `f` one property deeper.
    pub fn with_property<R>(&mut self, name: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.scoped(PathComponent::property(name), f)
    }

    /// Runs `f` one array position deeper.
    pub fn with_index<R>(&mut self, idx: usize, f: impl FnOnce(&mut Self) -> R) -> R {
        self.scoped(PathComponent::index(idx), f)
    }

    fn scoped<R>(&mut self, component: PathComponent, f: impl FnOnce(&mut Self) -> R) -> R {
        let depth = self.path.len();
        self.path.push(component);
        let result = f(self);
        self.path.truncate(depth);
        result
    }

    /// Starts an independent context at the current location with no errors.
    pub fn branch(&self) -> Self {
        Self {
            path: self.path.clone(),
            errors: ErrorCollector::new(),
        }
    }

    /// Merges the errors of a branch into this context.
    pub fn join(&mut self, branch: ValidationContext) {
        self.errors.join(branch.errors);
    }

    /// Finishes the run.
    pub fn into_result(self) -> ValidationResult {
        ValidationResult::from_errors(self.errors.into_errors())
    }
}

/// The outcome of validating one request.
///
/// Serializes as `{"isValid": bool, "errors": [{"message", "location"}, ...]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    is_valid: bool,
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Creates a result from a list of errors; valid iff the list is empty.
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// A result with no errors.
    pub fn valid() -> Self {
        Self::from_errors(Vec::new())
    }

    /// Returns true if no errors were found.
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// All errors, in the order they were found.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Consumes the result, returning its errors.
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    /// Converts into a stillwater `Validation` for applicative composition.
    ///
    /// ```rust
    /// use reqschema::ValidationResult;
    ///
    /// assert!(ValidationResult::valid().into_validation().is_success());
    /// ```
    pub fn into_validation(self) -> Validation<(), ValidationErrors> {
        match ValidationErrors::from_vec(self.errors) {
            Some(errors) => Validation::Failure(errors),
            None => Validation::Success(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing(field: &str) -> ErrorKind {
        ErrorKind::MissingField {
            field: field.to_string(),
        }
    }

    #[test]
    fn test_report_uses_current_path() {
        let mut ctx = ValidationContext::new();
        ctx.with_property("body", |ctx| {
            ctx.with_property("foo", |ctx| ctx.report(missing("foo")));
        });
        assert_eq!(ctx.errors().errors()[0].location, "body.foo");
        assert!(ctx.path().is_empty());
    }

    #[test]
    fn test_report_at_ignores_path() {
        let mut ctx = ValidationContext::new();
        ctx.with_property("body", |ctx| ctx.report_at("[Request]", missing("x")));
        assert_eq!(ctx.errors().errors()[0].location, "[Request]");
    }

    #[test]
    fn test_index_suffix() {
        let mut ctx = ValidationContext::new();
        let suffix = ctx.with_property("bar", |ctx| {
            ctx.with_index(2, |ctx| ctx.with_index(0, |ctx| ctx.index_suffix()))
        });
        assert_eq!(suffix, "[2][0]");
    }

    #[test]
    fn test_branch_and_join() {
        let mut ctx = ValidationContext::new();
        ctx.with_property("body", |ctx| {
            let mut branch = ctx.branch();
            branch.with_property("a", |b| b.report(missing("a")));
            assert!(!ctx.errors().has_errors());
            ctx.join(branch);
        });

        let result = ctx.into_result();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].location, "body.a");
    }

    #[test]
    fn test_result_validity_tracks_errors() {
        assert!(ValidationResult::valid().is_valid());
        let result = ValidationResult::from_errors(vec![ValidationError::new("q", missing("q"))]);
        assert!(!result.is_valid());
        assert!(result.into_validation().is_failure());
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let json = serde_json::to_value(ValidationResult::valid()).unwrap();
        assert_eq!(json, serde_json::json!({"isValid": true, "errors": []}));
    }
}
