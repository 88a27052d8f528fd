//! Import the common types with a single `use`.
//!
//! ```ignore
//! use schemagate_core::prelude::*;
//!
//! let mut router = ContractRouter::new(RouterConfig::new());
//! router.get(RouteDef::new("/health").public(), || async { "ok" })?;
//! ```

pub use crate::config::RouterConfig;
pub use crate::error::{ErrorBody, Failure, HttpError, StructuredError};
pub use crate::json_schema::JsonSchemaContract;
pub use crate::logging::CorrelationId;
pub use crate::meta::{RequestSchema, RouteSchema};
pub use crate::plugin::Plugin;
pub use crate::registry::{ContractRouter, VerbSchemas};
pub use crate::route::{PreHandler, RouteDef};
pub use crate::schema::Schema;

pub use crate::http::extract::State;
pub use crate::http::response::IntoResponse;
pub use crate::http::{Json, Router, StatusCode};
