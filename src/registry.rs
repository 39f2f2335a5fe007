//! Named validators shared across an application.
//!
//! A service usually validates many routes, each with its own schema. The
//! [`SchemaRegistry`] stores one [`Validator`] per route name so handlers can
//! look them up by name at request time.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::request::RequestParts;
use crate::schema::Schema;
use crate::validation::ValidationResult;
use crate::validator::{Validator, ValidatorOptions};

type ValidatorMap = Arc<RwLock<HashMap<String, Arc<Validator>>>>;

/// A thread-safe map from names to validators.
///
/// Cloning a registry is cheap and the clone shares storage with the
/// original: validators registered through one handle are visible through
/// every other.
///
/// # Thread Safety
///
/// - Any number of threads can look up and validate concurrently
/// - Registration takes a write lock and is serialized
///
/// # Example
///
/// ```rust
/// use reqschema::{Schema, SchemaRegistry};
/// use serde_json::json;
///
/// let registry = SchemaRegistry::new();
/// let schema: Schema = r#"{"types": {"params": {"id": {"type": "string", "required": true}}}}"#
///     .parse()
///     .unwrap();
/// registry.register_schema("get_user", schema).unwrap();
///
/// let result = registry
///     .validate("get_user", &json!({"params": {"id": "42"}}))
///     .unwrap();
/// assert!(result.is_valid());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    validators: ValidatorMap,
    options: ValidatorOptions,
}

impl SchemaRegistry {
    /// Creates an empty registry whose schemas are validated with default
    /// options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the options used for schemas registered with
    /// [`register_schema`](Self::register_schema) or loaded from disk.
    pub fn with_options(mut self, options: ValidatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> ValidatorOptions {
        self.options
    }

    /// Registers a validator under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if the name is taken. The
    /// existing validator is left in place.
    pub fn register(
        &self,
        name: impl Into<String>,
        validator: Validator,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        let mut validators = self.validators.write();

        if validators.contains_key(&name) {
            warn!(name = %name, "validator already registered");
            return Err(RegistryError::DuplicateName(name));
        }

        debug!(name = %name, types = validator.schema().len(), "registered validator");
        validators.insert(name, Arc::new(validator));
        Ok(())
    }

    /// Registers a schema under `name` using the registry's options.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if the name is taken.
    pub fn register_schema(
        &self,
        name: impl Into<String>,
        schema: Schema,
    ) -> Result<(), RegistryError> {
        self.register(name, Validator::with_options(schema, self.options))
    }

    /// Looks up a validator by name.
    pub fn get(&self, name: &str) -> Option<Arc<Validator>> {
        self.validators.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.validators.read().contains_key(name)
    }

    /// Returns every registered name, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.validators.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.validators.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.read().is_empty()
    }

    /// Validates a request with the validator registered under `name`.
    ///
    /// The lock is released before validation starts.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SchemaNotFound`] if nothing is registered
    /// under `name`.
    pub fn validate<R>(&self, name: &str, request: &R) -> Result<ValidationResult, RegistryError>
    where
        R: RequestParts + ?Sized,
    {
        let validator = self
            .get(name)
            .ok_or_else(|| RegistryError::SchemaNotFound(name.to_string()))?;
        Ok(validator.validate(request))
    }
}

/// Errors from registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("schema '{0}' already registered")]
    DuplicateName(String),

    #[error("schema '{0}' not found")]
    SchemaNotFound(String),
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<SchemaRegistry>();
    assert_sync::<SchemaRegistry>();
};
