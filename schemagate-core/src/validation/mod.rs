//! Request and response validation stages.
//!
//! Both stages are axum middleware installed per route by the
//! [`ContractRouter`](crate::registry::ContractRouter). They short-circuit
//! with an [`HttpError`](crate::HttpError) response, so nothing downstream
//! runs after a failure.

pub mod request;
pub mod response;

pub use request::{RequestPart, RequestValidator};
pub use response::{ResponseValidator, RESPONSE_MISMATCH};

use crate::error::StructuredError;
use serde_json::Value;

/// Parse a buffered JSON body. An empty body is `null`.
pub(crate) fn parse_json_body(bytes: &[u8]) -> Result<Value, StructuredError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes)
        .map_err(|err| StructuredError::new("", format!("should be valid JSON ({err})")))
}
