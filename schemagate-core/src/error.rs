use crate::http::response::{IntoResponse, Response};
use crate::http::{Json, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Client-visible message used when an unknown failure has no message of its own.
pub const FALLBACK_MESSAGE: &str = "Something went wrong";

// ── Error details ──────────────────────────────────────────

/// A field-level problem reported by a [`Schema`](crate::schema::Schema).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredError {
    /// Dotted locator of the offending field (`""` for the root value).
    pub path: String,
    pub message: String,
    /// The original offending value, when the schema reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl StructuredError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }
}

/// One entry of a failure's `errors` list: either a structured field error
/// or a bare message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Field(StructuredError),
    Message(String),
}

impl From<StructuredError> for ErrorDetail {
    fn from(err: StructuredError) -> Self {
        ErrorDetail::Field(err)
    }
}

impl From<String> for ErrorDetail {
    fn from(msg: String) -> Self {
        ErrorDetail::Message(msg)
    }
}

impl From<&str> for ErrorDetail {
    fn from(msg: &str) -> Self {
        ErrorDetail::Message(msg.to_string())
    }
}

// ── Failure payload ────────────────────────────────────────

/// Data carried by every taxonomy member of [`HttpError`].
///
/// `errors` is never empty: a failure built without details reports its own
/// message as the single entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub message: String,
    pub errors: Vec<ErrorDetail>,
    pub ref_code: Option<String>,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            errors: vec![ErrorDetail::Message(message.clone())],
            message,
            ref_code: None,
        }
    }

    /// Replace the error list. An empty list keeps the `[message]` default.
    pub fn with_errors<I, E>(mut self, errors: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<ErrorDetail>,
    {
        let errors: Vec<ErrorDetail> = errors.into_iter().map(Into::into).collect();
        if !errors.is_empty() {
            self.errors = errors;
        }
        self
    }

    pub fn with_ref_code(mut self, ref_code: impl Into<String>) -> Self {
        self.ref_code = Some(ref_code.into());
        self
    }
}

/// Canonical JSON body sent for every failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
    pub errors: Vec<ErrorDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_code: Option<String>,
}

impl ErrorBody {
    fn from_failure(status: StatusCode, failure: Failure) -> Self {
        Self {
            status: status.as_u16(),
            message: failure.message,
            errors: failure.errors,
            ref_code: failure.ref_code,
        }
    }
}

// ── Error taxonomy ─────────────────────────────────────────

/// Every failure a route can produce.
///
/// The first seven variants are the known taxonomy, each with a fixed status
/// code. `Unknown` holds anything else; it is coerced to a 500 when turned
/// into a response.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("Invalid Request: {}", .0.message)]
    InvalidRequest(Failure),
    #[error("Unauthorized: {}", .0.message)]
    Unauthorized(Failure),
    #[error("Forbidden: {}", .0.message)]
    Forbidden(Failure),
    #[error("Not Found: {}", .0.message)]
    NotFound(Failure),
    #[error("Unprocessable Entity: {}", .0.message)]
    UnprocessableEntity(Failure),
    #[error("Server Error: {}", .0.message)]
    Server(Failure),
    #[error("Service Unavailable: {}", .0.message)]
    ServiceUnavailable(Failure),
    #[error("{0}")]
    Unknown(anyhow::Error),
}

impl HttpError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        HttpError::InvalidRequest(Failure::new(message))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        HttpError::Unauthorized(Failure::new(message))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        HttpError::Forbidden(Failure::new(message))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        HttpError::NotFound(Failure::new(message))
    }

    pub fn unprocessable_entity(message: impl Into<String>) -> Self {
        HttpError::UnprocessableEntity(Failure::new(message))
    }

    pub fn server(message: impl Into<String>) -> Self {
        HttpError::Server(Failure::new(message))
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        HttpError::ServiceUnavailable(Failure::new(message))
    }

    /// Wrap a failure from outside the taxonomy.
    pub fn unknown(err: impl Into<anyhow::Error>) -> Self {
        HttpError::Unknown(err.into())
    }

    /// Replace the structured error list (no-op on `Unknown`).
    pub fn with_errors<I, E>(self, errors: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<ErrorDetail>,
    {
        self.map_failure(|f| f.with_errors(errors))
    }

    /// Attach a reference code (no-op on `Unknown`).
    pub fn with_ref_code(self, ref_code: impl Into<String>) -> Self {
        self.map_failure(|f| f.with_ref_code(ref_code))
    }

    /// The HTTP status code this failure is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            HttpError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            HttpError::Forbidden(_) => StatusCode::FORBIDDEN,
            HttpError::NotFound(_) => StatusCode::NOT_FOUND,
            HttpError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            HttpError::Server(_) | HttpError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
            HttpError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// The taxonomy payload, or `None` for `Unknown`.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            HttpError::InvalidRequest(f)
            | HttpError::Unauthorized(f)
            | HttpError::Forbidden(f)
            | HttpError::NotFound(f)
            | HttpError::UnprocessableEntity(f)
            | HttpError::Server(f)
            | HttpError::ServiceUnavailable(f) => Some(f),
            HttpError::Unknown(_) => None,
        }
    }

    /// Project this failure onto the response body it will be sent as.
    ///
    /// Does not log; logging of unknown failures happens in `into_response`.
    pub fn into_body(self) -> ErrorBody {
        let status = self.status();
        match self {
            HttpError::InvalidRequest(f)
            | HttpError::Unauthorized(f)
            | HttpError::Forbidden(f)
            | HttpError::NotFound(f)
            | HttpError::UnprocessableEntity(f)
            | HttpError::Server(f)
            | HttpError::ServiceUnavailable(f) => ErrorBody::from_failure(status, f),
            HttpError::Unknown(err) => ErrorBody::from_failure(status, coerce_message(&err.to_string())),
        }
    }

    fn map_failure(self, f: impl FnOnce(Failure) -> Failure) -> Self {
        match self {
            HttpError::InvalidRequest(x) => HttpError::InvalidRequest(f(x)),
            HttpError::Unauthorized(x) => HttpError::Unauthorized(f(x)),
            HttpError::Forbidden(x) => HttpError::Forbidden(f(x)),
            HttpError::NotFound(x) => HttpError::NotFound(f(x)),
            HttpError::UnprocessableEntity(x) => HttpError::UnprocessableEntity(f(x)),
            HttpError::Server(x) => HttpError::Server(f(x)),
            HttpError::ServiceUnavailable(x) => HttpError::ServiceUnavailable(f(x)),
            unknown @ HttpError::Unknown(_) => unknown,
        }
    }
}

/// Build the 500 payload for a failure outside the taxonomy.
pub(crate) fn coerce_message(message: &str) -> Failure {
    if message.is_empty() {
        Failure::new(FALLBACK_MESSAGE)
    } else {
        Failure::new(message)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        if let HttpError::Unknown(ref err) = self {
            tracing::error!(error = ?err, "Unexpected error");
        }
        let status = self.status();
        (status, Json(self.into_body())).into_response()
    }
}

impl From<anyhow::Error> for HttpError {
    fn from(err: anyhow::Error) -> Self {
        HttpError::Unknown(err)
    }
}

impl From<std::io::Error> for HttpError {
    fn from(err: std::io::Error) -> Self {
        HttpError::Unknown(err.into())
    }
}

impl From<serde_json::Error> for HttpError {
    fn from(err: serde_json::Error) -> Self {
        HttpError::Unknown(err.into())
    }
}
