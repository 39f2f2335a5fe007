//! Error types for schema construction and request validation.
//!
//! Schema problems are fatal and surface once, when a schema is built.
//! Validation problems are never fatal; every one found in a run is collected.

mod schema_error;
mod validation_error;

pub use schema_error::{SchemaError, SchemaErrors};
pub use validation_error::{
    ErrorCollector, ErrorKind, ValidationError, ValidationErrors, REQUEST_LOCATION,
};
