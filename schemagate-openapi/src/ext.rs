use crate::builder::build_spec;
use crate::handlers::docs_routes;
use schemagate_core::{ContractRouter, Plugin};
use serde_json::Value;

/// Plugin that serves the generated API description and a Swagger UI page.
///
/// The description is built when the router is finalized, so it covers every
/// route registered before or after the plugin was installed.
///
/// # Example
///
/// ```ignore
/// use schemagate_openapi::SwaggerDocs;
///
/// let mut router = ContractRouter::new(config);
/// router.with(SwaggerDocs::at("/docs"));
/// router.get(RouteDef::new("/pets"), list_pets)?;
/// let app = router.into_router(); // serves /docs and /docs/swagger.json
/// ```
pub struct SwaggerDocs {
    path: String,
}

impl SwaggerDocs {
    pub fn at(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Plugin for SwaggerDocs {
    fn install<S: Clone + Send + Sync + 'static>(self, router: &mut ContractRouter<S>) {
        let path = self.path;
        router.with_route_consumer(move |base, routes| {
            let spec = build_spec(base, routes);
            tracing::info!(path = %path, routes = routes.len(), "serving API docs");
            docs_routes(&path, &spec)
        });
    }
}

/// Description-related operations on a [`ContractRouter`].
pub trait SwaggerExt {
    /// The API description of every route registered so far.
    fn to_swagger(&self) -> Value;

    /// Serve the API description at `{path}/swagger.json` and a Swagger UI
    /// browser at `path`.
    fn serve_docs(&mut self, path: &str) -> &mut Self;
}

impl<S: Clone + Send + Sync + 'static> SwaggerExt for ContractRouter<S> {
    fn to_swagger(&self) -> Value {
        build_spec(&self.config().swagger_base(), self.routes())
    }

    fn serve_docs(&mut self, path: &str) -> &mut Self {
        self.with(SwaggerDocs::at(path))
    }
}
