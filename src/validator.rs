//! The validation entry point.
//!
//! A [`Validator`] pairs an immutable [`Schema`] with [`ValidatorOptions`]
//! and validates requests against it. It holds no per-call state, so a single
//! instance can be shared across threads and used concurrently.

use std::sync::Arc;

use rayon::prelude::*;
use serde::Deserialize;
use tracing::{debug, trace};

use crate::error::{ErrorKind, REQUEST_LOCATION};
use crate::request::RequestParts;
use crate::sanitize::Sanitizer;
use crate::schema::Schema;
use crate::type_check::{Coverage, TypeChecker};
use crate::validation::{ValidationContext, ValidationResult};

/// Knobs for a [`Validator`].
///
/// Options can be built in code or decoded from a host's configuration:
///
/// ```rust
/// use reqschema::ValidatorOptions;
///
/// let options: ValidatorOptions = serde_json::from_str(r#"{"sanitize": true}"#).unwrap();
/// assert!(options.sanitize);
/// assert!(!options.strict_nested_types);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidatorOptions {
    /// Run the content checks (`length`, `range`, `startsWith`, `isURL`,
    /// `arrayLengths`, enum membership) after the structural checks.
    pub sanitize: bool,
    /// Report missing and unexpected fields on nested named types too, not
    /// only on the request categories.
    pub strict_nested_types: bool,
}

impl ValidatorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables content checks.
    pub fn sanitize(mut self, enabled: bool) -> Self {
        self.sanitize = enabled;
        self
    }

    /// Enables or disables coverage checks on nested types.
    pub fn strict_nested_types(mut self, enabled: bool) -> Self {
        self.strict_nested_types = enabled;
        self
    }
}

/// Validates requests against a schema.
///
/// # Example
///
/// ```rust
/// use reqschema::{Schema, Validator};
/// use serde_json::json;
///
/// let schema: Schema = r#"{
///     "types": {
///         "body": { "foo": { "type": "number", "required": true } }
///     }
/// }"#
/// .parse()
/// .unwrap();
/// let validator = Validator::new(schema);
///
/// let result = validator.validate(&json!({"body": {"foo": "bar"}}));
/// assert!(!result.is_valid());
/// assert_eq!(result.errors()[0].location, "body.foo");
/// assert_eq!(result.errors()[0].message, "Property 'foo' should be type 'number'");
///
/// let result = validator.validate(&json!({}));
/// assert_eq!(result.errors()[0].location, "[Request]");
/// assert_eq!(result.errors()[0].message, "Request is missing 'body'");
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    schema: Arc<Schema>,
    options: ValidatorOptions,
}

impl Validator {
    /// Creates a validator with default options.
    pub fn new(schema: impl Into<Arc<Schema>>) -> Self {
        Self::with_options(schema, ValidatorOptions::default())
    }

    pub fn with_options(schema: impl Into<Arc<Schema>>, options: ValidatorOptions) -> Self {
        Self {
            schema: schema.into(),
            options,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn options(&self) -> ValidatorOptions {
        self.options
    }

    /// Validates one request, reporting every violation found.
    ///
    /// Categories are visited in the order body, cookies, headers, params,
    /// query. A category the schema does not declare is ignored. A declared
    /// category missing from the request yields one error at `[Request]`.
    pub fn validate<R>(&self, request: &R) -> ValidationResult
    where
        R: RequestParts + ?Sized,
    {
        let nested = if self.options.strict_nested_types {
            Coverage::Strict
        } else {
            Coverage::Lenient
        };
        let checker = TypeChecker::new(&self.schema).nested_coverage(nested);
        let sanitizer = Sanitizer::new(&self.schema);
        let mut ctx = ValidationContext::new();

        for (category, type_config) in self.schema.roots() {
            ctx.with_property(category.as_str(), |ctx| {
                let Some(map) = request.category(category) else {
                    trace!(%category, "declared category missing from request");
                    return ctx.report_at(REQUEST_LOCATION, ErrorKind::RootMissing { category });
                };

                checker.check_object(ctx, type_config, map, Coverage::Strict);

                if self.options.sanitize {
                    let mut branch = ctx.branch();
                    sanitizer.sanitize_object(&mut branch, type_config, map);
                    ctx.join(branch);
                }
            });
        }

        let result = ctx.into_result();
        debug!(
            valid = result.is_valid(),
            errors = result.errors().len(),
            "validated request"
        );
        result
    }

    /// Validates a batch of requests in parallel.
    ///
    /// Results are returned in the same order as `requests`.
    pub fn validate_all<R>(&self, requests: &[R]) -> Vec<ValidationResult>
    where
        R: RequestParts + Sync,
    {
        let results: Vec<ValidationResult> =
            requests.par_iter().map(|request| self.validate(request)).collect();
        debug!(
            requests = results.len(),
            invalid = results.iter().filter(|r| !r.is_valid()).count(),
            "validated batch"
        );
        results
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Validator>();
    assert_sync::<Validator>();
};
