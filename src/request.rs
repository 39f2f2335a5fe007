//! The request shape being validated.
//!
//! Validation only needs read access to the five categories of a request.
//! [`RequestParts`] is that seam: implement it for a framework's request type,
//! build a [`Request`] by hand, or pass a `serde_json::Value` whose top-level
//! keys are the category names.

use serde_json::{Map, Value};

use crate::schema::RootCategory;

/// Read access to the categories of a request.
///
/// A category that is absent returns `None`. A category that is present but
/// empty returns an empty map.
pub trait RequestParts {
    fn body(&self) -> Option<&Map<String, Value>>;
    fn cookies(&self) -> Option<&Map<String, Value>>;
    fn headers(&self) -> Option<&Map<String, Value>>;
    fn params(&self) -> Option<&Map<String, Value>>;
    fn query(&self) -> Option<&Map<String, Value>>;

    /// Looks up a category by kind.
    fn category(&self, category: RootCategory) -> Option<&Map<String, Value>> {
        match category {
            RootCategory::Body => self.body(),
            RootCategory::Cookies => self.cookies(),
            RootCategory::Headers => self.headers(),
            RootCategory::Params => self.params(),
            RootCategory::Query => self.query(),
        }
    }
}

/// An owned request with optional categories.
///
/// # Example
///
/// ```rust
/// use reqschema::{Request, RequestParts};
/// use serde_json::json;
///
/// let request = Request::new()
///     .with_body(json!({"name": "Ada"}))
///     .with_query(json!({}));
///
/// assert!(request.body().is_some());
/// assert!(request.query().unwrap().is_empty());
/// assert!(request.headers().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    body: Option<Map<String, Value>>,
    cookies: Option<Map<String, Value>>,
    headers: Option<Map<String, Value>>,
    params: Option<Map<String, Value>>,
    query: Option<Map<String, Value>>,
}

impl Request {
    /// Creates a request with every category absent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the body. Values that are not objects leave it absent.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = into_map(body);
        self
    }

    /// Sets the cookies. Values that are not objects leave them absent.
    pub fn with_cookies(mut self, cookies: Value) -> Self {
        self.cookies = into_map(cookies);
        self
    }

    /// Sets the headers. Values that are not objects leave them absent.
    pub fn with_headers(mut self, headers: Value) -> Self {
        self.headers = into_map(headers);
        self
    }

    /// Sets the route parameters. Values that are not objects leave them absent.
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = into_map(params);
        self
    }

    /// Sets the query. Values that are not objects leave it absent.
    pub fn with_query(mut self, query: Value) -> Self {
        self.query = into_map(query);
        self
    }

    /// Sets one category directly.
    pub fn with_category(mut self, category: RootCategory, map: Map<String, Value>) -> Self {
        let slot = match category {
            RootCategory::Body => &mut self.body,
            RootCategory::Cookies => &mut self.cookies,
            RootCategory::Headers => &mut self.headers,
            RootCategory::Params => &mut self.params,
            RootCategory::Query => &mut self.query,
        };
        *slot = Some(map);
        self
    }
}

fn into_map(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

impl RequestParts for Request {
    fn body(&self) -> Option<&Map<String, Value>> {
        self.body.as_ref()
    }

    fn cookies(&self) -> Option<&Map<String, Value>> {
        self.cookies.as_ref()
    }

    fn headers(&self) -> Option<&Map<String, Value>> {
        self.headers.as_ref()
    }

    fn params(&self) -> Option<&Map<String, Value>> {
        self.params.as_ref()
    }

    fn query(&self) -> Option<&Map<String, Value>> {
        self.query.as_ref()
    }
}

/// Reads categories from the top-level keys of a JSON object.
///
/// A key whose value is not an object counts as absent.
impl RequestParts for Value {
    fn body(&self) -> Option<&Map<String, Value>> {
        self.get("body").and_then(Value::as_object)
    }

    fn cookies(&self) -> Option<&Map<String, Value>> {
        self.get("cookies").and_then(Value::as_object)
    }

    fn headers(&self) -> Option<&Map<String, Value>> {
        self.get("headers").and_then(Value::as_object)
    }

    fn params(&self) -> Option<&Map<String, Value>> {
        self.get("params").and_then(Value::as_object)
    }

    fn query(&self) -> Option<&Map<String, Value>> {
        self.get("query").and_then(Value::as_object)
    }
}
