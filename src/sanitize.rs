//! Content constraints on top of structural checks.
//!
//! The [`Sanitizer`] walks the same schema as the
//! [`TypeChecker`](crate::TypeChecker) but only looks at values whose shape
//! already fits: strings are checked for `length`, `startsWith` and `isURL`,
//! numbers for `range`, enum strings for membership and arrays for
//! `arrayLengths` at each depth. Values of the wrong shape are skipped here;
//! the type checker reports those.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::ErrorKind;
use crate::schema::{FieldConfig, FieldType, Primitive, Schema, TypeConfig};
use crate::validation::ValidationContext;

/// Absolute `http`, `https` or `ftp` URLs with an IPv4, `localhost` or
/// dotted hostname, optional credentials, port and path.
const URL_PATTERN: &str = r"(?i)^(?:https?|ftp)://(?:\S+(?::\S*)?@)?(?:(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)(?:\.(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)){3}|(?:[\p{L}\p{N}](?:[\p{L}\p{N}-]*[\p{L}\p{N}])?\.)+\p{L}{2,}|localhost)(?::\d{2,5})?(?:[/?#]\S*)?$";

fn url_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(URL_PATTERN).expect("URL pattern is a valid regex"))
}

/// Returns true if `value` is an absolute URL.
///
/// ```rust
/// use reqschema::is_url;
///
/// assert!(is_url("https://example.com/a?b=c"));
/// assert!(is_url("http://localhost:8080"));
/// assert!(!is_url("example.com"));
/// ```
pub fn is_url(value: &str) -> bool {
    url_regex().is_match(value)
}

/// Checks content constraints against a schema.
#[derive(Debug, Clone, Copy)]
pub struct Sanitizer<'s> {
    schema: &'s Schema,
}

impl<'s> Sanitizer<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self { schema }
    }

    /// Sanitizes every declared field present in `map`, in declaration order.
    pub fn sanitize_object(
        &self,
        ctx: &mut ValidationContext,
        type_config: &TypeConfig,
        map: &Map<String, Value>,
    ) {
        for (name, config) in type_config.fields() {
            if let Some(value) = map.get(name) {
                ctx.with_property(name, |ctx| self.sanitize_value(ctx, name, value, config));
            }
        }
    }

    /// Sanitizes one value. The context's path must already point at it.
    pub fn sanitize_value(
        &self,
        ctx: &mut ValidationContext,
        field: &str,
        value: &Value,
        config: &FieldConfig,
    ) {
        match (config.field_type(), value) {
            (FieldType::Primitive(Primitive::String), Value::String(s)) => {
                sanitize_string(ctx, field, s, config)
            }
            (FieldType::Primitive(Primitive::Number), Value::Number(n)) => {
                if let (Some(range), Some(v)) = (config.range(), n.as_f64()) {
                    if !range.contains(v) {
                        // Same rendering as the bounds.
                        ctx.report(ErrorKind::OutOfRange {
                            value: v.to_string(),
                            min: range.min,
                            max: range.max,
                        });
                    }
                }
            }
            (FieldType::Enum, Value::String(s)) => {
                let values = config.values().unwrap_or_default();
                if !values.iter().any(|allowed| allowed == s) {
                    ctx.report(ErrorKind::IllegalEnumValue {
                        value: s.clone(),
                        values: values.to_vec(),
                    });
                }
            }
            (FieldType::Array(_), Value::Array(items)) => {
                self.sanitize_array(ctx, field, items, config, 0)
            }
            (FieldType::Named(name), Value::Object(map)) => {
                if let Some(type_config) = self.schema.type_config(name) {
                    self.sanitize_object(ctx, type_config, map);
                }
            }
            _ => {}
        }
    }

    /// Checks the length of an array at `depth`, then each of its elements.
    fn sanitize_array(
        &self,
        ctx: &mut ValidationContext,
        field: &str,
        items: &[Value],
        config: &FieldConfig,
        depth: usize,
    ) {
        if let Some(&expected) = config.array_lengths().get(depth) {
            if items.len() != expected {
                let path = format!("{}{}", field, ctx.index_suffix());
                ctx.report(ErrorKind::IllegalArrayLength {
                    path,
                    actual: items.len(),
                    expected,
                });
            }
        }

        let Some(element) = config.element() else {
            return;
        };
        for (idx, item) in items.iter().enumerate() {
            ctx.with_index(idx, |ctx| match item {
                Value::Array(sub) if element.field_type().is_array() => {
                    self.sanitize_array(ctx, field, sub, &element, depth + 1)
                }
                _ => self.sanitize_value(ctx, field, item, &element),
            });
        }
    }
}

fn sanitize_string(ctx: &mut ValidationContext, field: &str, value: &str, config: &FieldConfig) {
    if let Some(expected) = config.length() {
        let actual = value.chars().count();
        if actual != expected {
            ctx.report(ErrorKind::IllegalLength {
                field: field.to_string(),
                actual,
                expected,
            });
        }
    }

    if let Some(prefix) = config.starts_with() {
        if !value.starts_with(prefix) {
            ctx.report(ErrorKind::DoesNotStartWith {
                value: value.to_string(),
                prefix: prefix.to_string(),
            });
        }
    }

    if config.is_url() && !is_url(value) {
        ctx.report(ErrorKind::NotUrl {
            value: value.to_string(),
        });
    }
}
