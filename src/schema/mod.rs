//! The schema model.
//!
//! A [`Schema`] is a set of named types. Each type maps field names to a
//! [`FieldConfig`]. Five type names are reserved for the request categories
//! (see [`RootCategory`]); declaring one opts that category into validation.
//!
//! Schemas are checked once, when they are built. Every type string must
//! resolve to a built-in type, an `array[...]` of a resolvable type or another
//! declared type. A schema that fails the check is never produced; all
//! problems are reported together.
//!
//! # Example
//!
//! ```rust
//! use reqschema::Schema;
//!
//! let schema: Schema = r#"{
//!     "types": {
//!         "body": {
//!             "user": { "type": "User", "required": true }
//!         },
//!         "User": {
//!             "name": { "type": "string", "required": true }
//!         }
//!     }
//! }"#
//! .parse()
//! .unwrap();
//!
//! assert!(schema.type_config("User").is_some());
//! ```

mod definition;
mod field;

use std::collections::HashSet;
use std::fmt::{self, Display};
use std::str::FromStr;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{SchemaError, SchemaErrors};

pub use definition::{FieldDefinition, SchemaDefinition, TypeDefinition};
pub use field::{FieldConfig, FieldType, NumericRange, Primitive};

use field::RESERVED_TYPE_NAMES;

/// The top-level sections of a request, in validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootCategory {
    Body,
    Cookies,
    Headers,
    Params,
    Query,
}

impl RootCategory {
    /// Every category, in the order validation visits them.
    pub const ALL: [RootCategory; 5] = [
        RootCategory::Body,
        RootCategory::Cookies,
        RootCategory::Headers,
        RootCategory::Params,
        RootCategory::Query,
    ];

    /// The reserved type name for this category.
    pub fn as_str(self) -> &'static str {
        match self {
            RootCategory::Body => "body",
            RootCategory::Cookies => "cookies",
            RootCategory::Headers => "headers",
            RootCategory::Params => "params",
            RootCategory::Query => "query",
        }
    }
}

impl Display for RootCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fields of one named type, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeConfig {
    fields: IndexMap<String, FieldConfig>,
}

impl TypeConfig {
    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldConfig> {
        self.fields.get(name)
    }

    /// Returns true if the type declares `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Iterates over fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldConfig)> {
        self.fields.iter().map(|(name, config)| (name.as_str(), config))
    }

    /// Iterates over the names of required fields in declaration order.
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields()
            .filter(|(_, config)| config.is_required())
            .map(|(name, _)| name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// An immutable, fully resolved set of named types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    types: IndexMap<String, TypeConfig>,
}

impl Schema {
    /// Checks a definition and resolves it into a schema.
    ///
    /// # Errors
    ///
    /// Returns every problem found: unknown or malformed type strings, enums
    /// without values, inverted ranges and type names that shadow built-in
    /// types.
    pub fn from_definition(definition: SchemaDefinition) -> Result<Self, SchemaErrors> {
        let declared: HashSet<&str> = definition
            .types
            .keys()
            .map(String::as_str)
            .filter(|name| !RESERVED_TYPE_NAMES.contains(name))
            .collect();

        let mut errors = Vec::new();
        let mut types = IndexMap::with_capacity(definition.types.len());

        for (type_name, type_def) in &definition.types {
            if RESERVED_TYPE_NAMES.contains(&type_name.as_str()) {
                errors.push(SchemaError::ReservedTypeName(type_name.clone()));
                continue;
            }

            let mut fields = IndexMap::with_capacity(type_def.fields.len());
            for (field_name, field_def) in &type_def.fields {
                match resolve_field(type_name, field_name, field_def, &declared) {
                    Ok(config) => {
                        fields.insert(field_name.clone(), config);
                    }
                    Err(mut field_errors) => errors.append(&mut field_errors),
                }
            }
            types.insert(type_name.clone(), TypeConfig { fields });
        }

        if let Some(errors) = SchemaErrors::from_vec(errors) {
            debug!(errors = errors.len(), "rejected schema definition");
            return Err(errors);
        }

        let schema = Self { types };
        debug!(
            types = schema.types.len(),
            roots = ?schema.roots().map(|(category, _)| category.as_str()).collect::<Vec<_>>(),
            "built schema"
        );
        Ok(schema)
    }

    /// Decodes and resolves a schema from a JSON value.
    pub fn from_json_value(value: &Value) -> Result<Self, SchemaErrors> {
        let definition = SchemaDefinition::deserialize(value).map_err(SchemaError::from)?;
        Self::from_definition(definition)
    }

    /// Looks up a named type.
    pub fn type_config(&self, name: &str) -> Option<&TypeConfig> {
        self.types.get(name)
    }

    /// Looks up the type declared for a request category.
    pub fn root(&self, category: RootCategory) -> Option<&TypeConfig> {
        self.type_config(category.as_str())
    }

    /// Iterates over the declared request categories in validation order.
    pub fn roots(&self) -> impl Iterator<Item = (RootCategory, &TypeConfig)> {
        RootCategory::ALL
            .into_iter()
            .filter_map(|category| self.root(category).map(|config| (category, config)))
    }

    /// Iterates over every declared type name.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromStr for Schema {
    type Err = SchemaErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let definition: SchemaDefinition = serde_json::from_str(s).map_err(SchemaError::from)?;
        Self::from_definition(definition)
    }
}

impl TryFrom<SchemaDefinition> for Schema {
    type Error = SchemaErrors;

    fn try_from(definition: SchemaDefinition) -> Result<Self, Self::Error> {
        Self::from_definition(definition)
    }
}

/// Resolves one field, collecting every problem with it.
fn resolve_field(
    owner: &str,
    field: &str,
    definition: &FieldDefinition,
    declared: &HashSet<&str>,
) -> Result<FieldConfig, Vec<SchemaError>> {
    let field_type = FieldType::parse(&definition.type_name).map_err(|_| {
        vec![SchemaError::MalformedType {
            owner: owner.to_string(),
            field: field.to_string(),
            type_name: definition.type_name.clone(),
        }]
    })?;

    let mut errors = Vec::new();

    if let Some(name) = field_type.referenced_type() {
        if !declared.contains(name) {
            errors.push(SchemaError::UnknownType {
                owner: owner.to_string(),
                field: field.to_string(),
                type_name: name.to_string(),
            });
        }
    }

    let has_values = definition.values.as_ref().is_some_and(|v| !v.is_empty());
    if field_type.innermost().is_enum() && !has_values {
        errors.push(SchemaError::MissingEnumValues {
            owner: owner.to_string(),
            field: field.to_string(),
        });
    }

    if let Some([min, max]) = definition.range {
        if min > max {
            errors.push(SchemaError::InvalidRange {
                owner: owner.to_string(),
                field: field.to_string(),
                min,
                max,
            });
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let mut config = FieldConfig::new(field_type);
    config.required = definition.required;
    config.values = definition.values.clone();
    config.range = definition.range.map(|[min, max]| NumericRange { min, max });
    config.is_url = definition.is_url;
    config.starts_with = definition.starts_with.clone();
    config.length = definition.length;
    config.array_lengths = definition.array_lengths.clone().unwrap_or_default();
    Ok(config)
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Schema>();
    assert_sync::<Schema>();
};
