pub mod config;
pub mod error;
pub mod http;
pub mod json_schema;
pub mod layers;
pub mod logging;
pub mod meta;
pub mod plugin;
pub mod prelude;
pub mod registry;
pub mod route;
pub mod schema;
pub mod validation;

pub use config::{ConfigError, CorrelationIdExtractor, RouterConfig};
pub use error::{ErrorBody, ErrorDetail, Failure, HttpError, StructuredError};
pub use json_schema::{ContractError, JsonSchemaContract};
pub use layers::{catch_panic_layer, init_tracing};
pub use logging::CorrelationId;
pub use meta::{brace_path, RequestSchema, RouteDescriptor, RouteSchema};
pub use plugin::Plugin;
pub use registry::{ContractRouter, RegistryError, VerbSchemas};
pub use route::{PreHandler, RouteDef};
pub use schema::{Schema, SharedSchema};

pub use schemars;
