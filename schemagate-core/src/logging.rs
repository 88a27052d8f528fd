//! Request/response logging with a per-request correlation id.
//!
//! Enabled by [`RouterConfig::log_requests`](crate::RouterConfig). Each
//! request produces two `INFO` events:
//!
//! ```text
//! request: (<id>) PUT /api/pets/1 {"action":"create"}
//! response: (<id>) 201: {"id":1}
//! ```

use crate::config::CorrelationIdExtractor;
use crate::error::HttpError;
use crate::http::body::{to_bytes, Body};
use crate::http::extract::{FromRequestParts, Request, State};
use crate::http::middleware::Next;
use crate::http::response::Response;
use crate::http::Parts;
use std::sync::Arc;

/// Correlation id of the current request.
///
/// Inserted as a request extension by the logging stage; handlers can take
/// it as an extractor. Outside logged routes a fresh UUID v4 is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(pub String);

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CorrelationId {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<CorrelationId>()
            .cloned()
            .unwrap_or_else(|| CorrelationId(uuid::Uuid::new_v4().to_string())))
    }
}

pub(crate) struct RequestLogger {
    extractor: Option<CorrelationIdExtractor>,
}

impl RequestLogger {
    pub(crate) fn new(extractor: Option<CorrelationIdExtractor>) -> Self {
        Self { extractor }
    }

    fn correlation_id(&self, parts: &Parts) -> CorrelationId {
        match &self.extractor {
            Some(extract) => CorrelationId(extract(parts)),
            None => CorrelationId(uuid::Uuid::new_v4().to_string()),
        }
    }
}

pub(crate) async fn log_requests(
    State(logger): State<Arc<RequestLogger>>,
    req: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let (mut parts, body) = req.into_parts();
    let id = logger.correlation_id(&parts);
    parts.extensions.insert(id.clone());

    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| HttpError::invalid_request("Request body could not be read"))?;
    tracing::info!(
        correlation_id = %id,
        "request: ({id}) {} {} {}",
        parts.method,
        parts.uri,
        String::from_utf8_lossy(&bytes)
    );

    let response = next.run(Request::from_parts(parts, Body::from(bytes))).await;

    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.map_err(HttpError::unknown)?;
    tracing::info!(
        correlation_id = %id,
        "response: ({id}) {}: {}",
        parts.status.as_u16(),
        String::from_utf8_lossy(&bytes)
    );
    Ok(Response::from_parts(parts, Body::from(bytes)))
}
