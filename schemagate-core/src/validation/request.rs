use crate::error::{HttpError, StructuredError};
use crate::http::body::{to_bytes, Body};
use crate::http::extract::{FromRequestParts, RawPathParams, Request, State};
use crate::http::middleware::Next;
use crate::http::response::Response;
use crate::meta::RequestSchema;
use crate::schema::SharedSchema;
use serde_json::{Map, Value};
use std::sync::Arc;

/// The three request parts a route may declare a schema for, in the order
/// they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPart {
    Params,
    Query,
    Body,
}

impl RequestPart {
    /// Fixed failure message for this part.
    pub fn message(self) -> &'static str {
        match self {
            RequestPart::Params => "Invalid url path parameters",
            RequestPart::Query => "Invalid url query parameters",
            RequestPart::Body => "Invalid payload",
        }
    }
}

/// Validates path params, query and body against a route's request schema.
pub struct RequestValidator {
    schema: RequestSchema,
    warn_only: bool,
}

impl RequestValidator {
    pub fn new(schema: RequestSchema, warn_only: bool) -> Self {
        Self { schema, warn_only }
    }

    pub fn needs_body(&self) -> bool {
        self.schema.body.is_some()
    }

    /// Check params, then query, then body.
    ///
    /// The first part with errors fails the request; later parts are not
    /// checked. In warn mode every failing part is logged instead and the
    /// check always succeeds.
    pub fn check(
        &self,
        params: &Value,
        query: &Value,
        body: &Result<Value, StructuredError>,
    ) -> Result<(), HttpError> {
        let parts: [(RequestPart, &Option<SharedSchema>, Result<&Value, &StructuredError>); 3] = [
            (RequestPart::Params, &self.schema.params, Ok(params)),
            (RequestPart::Query, &self.schema.query, Ok(query)),
            (RequestPart::Body, &self.schema.body, body.as_ref()),
        ];

        for (part, schema, value) in parts {
            let Some(schema) = schema else { continue };
            let errors = match value {
                Ok(value) => schema.validate(value),
                Err(unparsable) => vec![unparsable.clone()],
            };
            if errors.is_empty() {
                continue;
            }
            if self.warn_only {
                let serialized = serde_json::to_string(&errors).unwrap_or_default();
                tracing::warn!(errors = %serialized, "{}", part.message());
                continue;
            }
            return Err(HttpError::invalid_request(part.message()).with_errors(errors));
        }
        Ok(())
    }
}

/// Middleware running a [`RequestValidator`] ahead of the handler.
///
/// The body is only buffered when a body schema is declared, and is handed
/// to the next stage unchanged.
pub(crate) async fn validate_request(
    State(validator): State<Arc<RequestValidator>>,
    req: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let (mut parts, body) = req.into_parts();

    let params = match RawPathParams::from_request_parts(&mut parts, &()).await {
        Ok(raw) => path_params_value(&raw),
        Err(_) => Value::Object(Map::new()),
    };
    let query = query_value(parts.uri.query());

    let (body_value, body) = if validator.needs_body() {
        let bytes = to_bytes(body, usize::MAX)
            .await
            .map_err(|_| HttpError::invalid_request("Request body could not be read"))?;
        (super::parse_json_body(&bytes), Body::from(bytes))
    } else {
        (Ok(Value::Null), body)
    };

    validator.check(&params, &query, &body_value)?;
    Ok(next.run(Request::from_parts(parts, body)).await)
}

fn path_params_value(raw: &RawPathParams) -> Value {
    let map = raw
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect::<Map<_, _>>();
    Value::Object(map)
}

/// Decode a query string into an object of strings. Repeated keys collect
/// into an array in order of appearance.
pub(crate) fn query_value(query: Option<&str>) -> Value {
    let mut map = Map::new();
    let Some(query) = query else {
        return Value::Object(map);
    };
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let value = Value::String(value.into_owned());
        match map.get_mut(&*key) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(key.into_owned(), value);
            }
        }
    }
    Value::Object(map)
}
