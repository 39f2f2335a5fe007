//! # Reqschema
//!
//! Schema-driven request validation that reports ALL errors, each with the
//! exact location it was found at, rather than stopping at the first one.
//!
//! ## Overview
//!
//! A [`Schema`] is a set of named types. The reserved names `body`,
//! `cookies`, `headers`, `params` and `query` describe the categories of a
//! request; any other name declares a reusable (possibly recursive) object
//! type. Field types are `string`, `number`, `boolean`, `enum`, `any`,
//! `array[...]` of any of those, or a declared type name.
//!
//! A [`Validator`] walks a request in lock-step with its schema and produces a
//! [`ValidationResult`]. Locations are rendered paths such as
//! `body.bar[0][1].baz`; a declared category the request lacks is reported at
//! `[Request]`. With [`ValidatorOptions::sanitize`] enabled a second pass
//! checks value content: string length, prefix and URL shape, numeric range,
//! enum membership and per-depth array lengths.
//!
//! ## Core Types
//!
//! - [`Path`]: the location of a value inside a request
//! - [`Schema`]: immutable, checked-at-construction named types
//! - [`Validator`]: the validation entry point
//! - [`ValidationResult`]: validity plus every [`ValidationError`] found
//! - [`SchemaRegistry`]: named validators shared across an application
//!
//! ## Example
//!
//! ```rust
//! use reqschema::{Schema, Validator, ValidatorOptions};
//! use serde_json::json;
//!
//! let schema: Schema = r#"{
//!     "types": {
//!         "body": {
//!             "bar": { "type": "array[array[Item]]", "required": true }
//!         },
//!         "Item": {
//!             "baz": { "type": "string", "required": true, "length": 2 }
//!         }
//!     }
//! }"#
//! .parse()
//! .unwrap();
//!
//! let validator = Validator::with_options(schema, ValidatorOptions::new().sanitize(true));
//! let result = validator.validate(&json!({
//!     "body": { "bar": [[{ "baz": "ok" }, { "baz": 1 }], [{ "baz": "long" }]] }
//! }));
//!
//! let errors: Vec<_> = result
//!     .errors()
//!     .iter()
//!     .map(|e| (e.location.as_str(), e.message.as_str()))
//!     .collect();
//! assert_eq!(
//!     errors,
//!     vec![
//!         ("body.bar[0][1].baz", "Property 'baz' should be type 'string'"),
//!         ("body.bar[1][0].baz", "Length of 'baz' is 4 when it should be 2"),
//!     ]
//! );
//! ```

pub mod error;
pub mod loading;
pub mod path;
pub mod registry;
pub mod request;
pub mod sanitize;
pub mod schema;
pub mod type_check;
pub mod validation;
pub mod validator;

pub use error::{
    ErrorCollector, ErrorKind, SchemaError, SchemaErrors, ValidationError, ValidationErrors,
    REQUEST_LOCATION,
};
pub use loading::{FileSystem, SchemaLoadError, StdFileSystem};
pub use path::{Path, PathComponent, PathError};
pub use registry::{RegistryError, SchemaRegistry};
pub use request::{Request, RequestParts};
pub use sanitize::{is_url, Sanitizer};
pub use schema::{
    FieldConfig, FieldDefinition, FieldType, NumericRange, Primitive, RootCategory, Schema,
    SchemaDefinition, TypeConfig, TypeDefinition,
};
pub use type_check::{Coverage, TypeChecker};
pub use validation::{ValidationContext, ValidationResult};
pub use validator::{Validator, ValidatorOptions};
