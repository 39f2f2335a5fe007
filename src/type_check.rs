//! Structural type checking.
//!
//! [`TypeChecker`] walks a value in lock-step with its declared
//! [`FieldType`], descending through arrays and named types and reporting
//! every shape mismatch at the exact location it occurs.

use serde_json::{Map, Value};

use crate::error::ErrorKind;
use crate::schema::{FieldConfig, FieldType, Schema, TypeConfig};
use crate::validation::ValidationContext;

/// Whether an object check reports missing and unexpected keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    /// Report missing required fields and undeclared keys.
    Strict,
    /// Only type-check the declared fields that are present.
    Lenient,
}

/// Checks values against the types of a schema.
///
/// # Example
///
/// ```rust
/// use reqschema::{RootCategory, Schema, TypeChecker, ValidationContext};
/// use serde_json::json;
///
/// let schema: Schema = r#"{"types": {"body": {"foo": {"type": "number"}}}}"#
///     .parse()
///     .unwrap();
/// let body = schema.root(RootCategory::Body).unwrap();
/// let config = body.field("foo").unwrap();
///
/// let mut ctx = ValidationContext::new();
/// ctx.with_property("foo", |ctx| {
///     TypeChecker::new(&schema).check_value(ctx, "foo", &json!("bar"), config)
/// });
///
/// let result = ctx.into_result();
/// assert_eq!(result.errors()[0].message, "Property 'foo' should be type 'number'");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TypeChecker<'s> {
    schema: &'s Schema,
    nested_coverage: Coverage,
}

impl<'s> TypeChecker<'s> {
    /// Creates a checker that only type-checks fields of nested types.
    pub fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            nested_coverage: Coverage::Lenient,
        }
    }

    /// Sets how objects of named types nested inside a category are checked.
    pub fn nested_coverage(mut self, coverage: Coverage) -> Self {
        self.nested_coverage = coverage;
        self
    }

    /// Checks a request category against its type.
    ///
    /// With [`Coverage::Strict`] this first reports required fields that are
    /// absent (in declaration order) and keys the type does not declare (in
    /// mapping order). Every declared field that is present is then
    /// type-checked in declaration order.
    pub fn check_object(
        &self,
        ctx: &mut ValidationContext,
        type_config: &TypeConfig,
        map: &Map<String, Value>,
        coverage: Coverage,
    ) {
        if coverage == Coverage::Strict {
            report_coverage(ctx, type_config, map);
        }

        for (name, config) in type_config.fields() {
            if let Some(value) = map.get(name) {
                ctx.with_property(name, |ctx| self.check_value(ctx, name, value, config));
            }
        }
    }

    /// Checks an object of a named type found inside a category.
    ///
    /// Keys are walked in the object's own order; keys the type does not
    /// declare are skipped unless nested coverage is strict.
    fn check_nested(
        &self,
        ctx: &mut ValidationContext,
        type_config: &TypeConfig,
        map: &Map<String, Value>,
    ) {
        if self.nested_coverage == Coverage::Strict {
            report_coverage(ctx, type_config, map);
        }

        for (key, value) in map {
            if let Some(config) = type_config.field(key) {
                ctx.with_property(key, |ctx| self.check_value(ctx, key, value, config));
            }
        }
    }

    /// Checks one value against a field's declared type.
    ///
    /// `field` is the name used in messages; the context's path must already
    /// point at the value.
    pub fn check_value(
        &self,
        ctx: &mut ValidationContext,
        field: &str,
        value: &Value,
        config: &FieldConfig,
    ) {
        match config.field_type() {
            FieldType::Any => {}
            FieldType::Primitive(primitive) => {
                if !primitive.matches(value) {
                    report_incorrect_type(ctx, field, config.field_type());
                }
            }
            FieldType::Enum => {
                let Some(s) = value.as_str() else {
                    return report_incorrect_type(ctx, field, config.field_type());
                };
                let values = config.values().unwrap_or_default();
                if !values.iter().any(|allowed| allowed == s) {
                    ctx.report(ErrorKind::EnumValueNotAllowed {
                        field: field.to_string(),
                        values: values.to_vec(),
                    });
                }
            }
            FieldType::Array(_) => {
                let Some(items) = value.as_array() else {
                    return report_incorrect_type(ctx, field, config.field_type());
                };
                if let Some(element) = config.element() {
                    for (idx, item) in items.iter().enumerate() {
                        ctx.with_index(idx, |ctx| self.check_value(ctx, field, item, &element));
                    }
                }
            }
            FieldType::Named(name) => {
                let Some(map) = value.as_object() else {
                    return report_incorrect_type(ctx, field, config.field_type());
                };
                // Resolution is guaranteed when the schema is built.
                if let Some(type_config) = self.schema.type_config(name) {
                    self.check_nested(ctx, type_config, map);
                }
            }
        }
    }
}

fn report_coverage(
    ctx: &mut ValidationContext,
    type_config: &TypeConfig,
    map: &Map<String, Value>,
) {
    for name in type_config.required_fields() {
        if !map.contains_key(name) {
            ctx.with_property(name, |ctx| {
                ctx.report(ErrorKind::MissingField {
                    field: name.to_string(),
                })
            });
        }
    }
    for key in map.keys() {
        if !type_config.contains(key) {
            ctx.with_property(key, |ctx| {
                ctx.report(ErrorKind::UnexpectedField { field: key.clone() })
            });
        }
    }
}

fn report_incorrect_type(ctx: &mut ValidationContext, field: &str, declared: &FieldType) {
    let index_suffix = ctx.index_suffix();
    ctx.report(ErrorKind::IncorrectType {
        field: field.to_string(),
        index_suffix,
        declared_type: declared.to_string(),
    });
}
