use crate::error::HttpError;
use crate::http::body::{to_bytes, Body};
use crate::http::extract::{Request, State};
use crate::http::middleware::Next;
use crate::http::response::Response;
use crate::http::StatusCode;
use crate::schema::SharedSchema;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Message of the 500 raised when a handler emits a body that breaks its
/// declared response schema.
pub const RESPONSE_MISMATCH: &str = "Response body does not match the specified schema";

/// Checks outgoing bodies against the schema declared for their status code.
pub struct ResponseValidator {
    schemas: BTreeMap<u16, SharedSchema>,
}

impl ResponseValidator {
    pub fn new(schemas: BTreeMap<u16, SharedSchema>) -> Self {
        Self { schemas }
    }

    /// Schema declared for `status`, if any.
    pub fn schema_for(&self, status: StatusCode) -> Option<&SharedSchema> {
        self.schemas.get(&status.as_u16())
    }

    /// Validate a buffered body. Status codes without a schema always pass.
    pub fn check(&self, status: StatusCode, body: &[u8]) -> Result<(), HttpError> {
        let Some(schema) = self.schema_for(status) else {
            return Ok(());
        };
        let errors = match super::parse_json_body(body) {
            Ok(value) => schema.validate(&value),
            Err(unparsable) => vec![unparsable],
        };
        if errors.is_empty() {
            Ok(())
        } else {
            Err(HttpError::server(RESPONSE_MISMATCH).with_errors(errors))
        }
    }
}

/// Middleware wrapping the handler: the response is checked before it is
/// emitted, and emitted once, either as-is or replaced by the failure.
pub(crate) async fn validate_response(
    State(validator): State<Arc<ResponseValidator>>,
    req: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let response = next.run(req).await;
    if validator.schema_for(response.status()).is_none() {
        return Ok(response);
    }

    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.map_err(HttpError::unknown)?;
    validator.check(parts.status, &bytes)?;
    Ok(Response::from_parts(parts, Body::from(bytes)))
}
