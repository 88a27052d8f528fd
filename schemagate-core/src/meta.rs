use crate::http::Method;
use crate::schema::{Schema, SharedSchema};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Request-side schemas of a route. Each part is optional; an absent part is
/// never checked.
#[derive(Clone, Default)]
pub struct RequestSchema {
    pub params: Option<SharedSchema>,
    pub query: Option<SharedSchema>,
    pub body: Option<SharedSchema>,
}

impl RequestSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(mut self, schema: impl Schema) -> Self {
        self.params = Some(Arc::new(schema));
        self
    }

    pub fn query(mut self, schema: impl Schema) -> Self {
        self.query = Some(Arc::new(schema));
        self
    }

    pub fn body(mut self, schema: impl Schema) -> Self {
        self.body = Some(Arc::new(schema));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_none() && self.query.is_none() && self.body.is_none()
    }

    /// Raw structural descriptions keyed by part (`params`, `query`, `body`).
    pub fn describe(&self) -> Value {
        let mut out = Map::new();
        let parts = [("params", &self.params), ("query", &self.query), ("body", &self.body)];
        for (key, schema) in parts {
            if let Some(schema) = schema {
                out.insert(key.to_string(), schema.describe());
            }
        }
        Value::Object(out)
    }
}

/// Everything a route declares about its contract.
#[derive(Clone, Default)]
pub struct RouteSchema {
    pub request: Option<RequestSchema>,
    pub responses: BTreeMap<u16, SharedSchema>,
}

impl RouteSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(mut self, request: RequestSchema) -> Self {
        self.request = Some(request);
        self
    }

    /// Declare the body schema for responses sent with `status`.
    pub fn response(mut self, status: u16, schema: impl Schema) -> Self {
        self.responses.insert(status, Arc::new(schema));
        self
    }
}

/// Immutable record of a registered route, read by the description generator.
#[derive(Clone)]
pub struct RouteDescriptor {
    pub method: Method,
    /// URL pattern as registered, in `/:name` or `/{name}` form.
    pub url: String,
    pub schema: RouteSchema,
    pub is_public: bool,
    pub tags: Vec<String>,
    pub summary: String,
    pub description: String,
}

impl std::fmt::Debug for RouteDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteDescriptor")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("is_public", &self.is_public)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

/// Translate `/:name` path segments into the `/{name}` form used by axum and
/// by the generated description. Segments already in brace form pass through.
pub fn brace_path(url: &str) -> String {
    url.split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => format!("{{{name}}}"),
            None => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}
