mod builder;
mod ext;
mod handlers;

pub use builder::build_spec;
pub use ext::{SwaggerDocs, SwaggerExt};
pub use handlers::docs_routes;
