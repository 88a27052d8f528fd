//! The route registry: ties each route's contract, middleware stack and
//! documentation metadata together, and hands the assembled router to axum.

use crate::config::RouterConfig;
use crate::http::middleware::from_fn_with_state;
use crate::http::routing::{on, Handler, MethodFilter, MethodRouter};
use crate::http::{Json, Method, Router};
use crate::logging::{log_requests, RequestLogger};
use crate::meta::{brace_path, RequestSchema, RouteDescriptor};
use crate::plugin::Plugin;
use crate::route::{run_pre_handlers, PreHandlerChain, RouteDef};
use crate::validation::request::{validate_request, RequestValidator};
use crate::validation::response::{validate_response, ResponseValidator};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Consumes the frozen route table (plus the base description document) and
/// returns extra routes to merge into the application.
type RouteConsumer<S> = Box<dyn FnOnce(&Value, &[Arc<RouteDescriptor>]) -> Router<S> + Send>;

/// Error type for route registration.
///
/// Registration errors are configuration mistakes: propagate them out of
/// startup rather than serving a partially registered router.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Route already defined: ({method}) {url}")]
    DuplicateRoute { method: Method, url: String },
    /// Same path shape as an earlier route, with different parameter names.
    /// axum cannot serve both.
    #[error("Route {url} conflicts with {existing}: parameter names differ")]
    ConflictingRoute { url: String, existing: String },
    #[error("Unsupported HTTP method for route registration: {0}")]
    UnsupportedMethod(Method),
}

/// Request schemas of the `get`, `post` and `put` verbs of one URL, served by
/// [`ContractRouter::expose_schema`].
#[derive(Clone, Default)]
pub struct VerbSchemas {
    pub get: Option<RequestSchema>,
    pub post: Option<RequestSchema>,
    pub put: Option<RequestSchema>,
}

impl VerbSchemas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(mut self, schema: RequestSchema) -> Self {
        self.get = Some(schema);
        self
    }

    pub fn post(mut self, schema: RequestSchema) -> Self {
        self.post = Some(schema);
        self
    }

    pub fn put(mut self, schema: RequestSchema) -> Self {
        self.put = Some(schema);
        self
    }

    /// `{get?: {params?, query?, body?}, post?: …, put?: …}`
    pub fn describe(&self) -> Value {
        let mut out = Map::new();
        for (verb, schema) in [("get", &self.get), ("post", &self.post), ("put", &self.put)] {
            if let Some(schema) = schema {
                out.insert(verb.to_string(), schema.describe());
            }
        }
        Value::Object(out)
    }
}

/// Schema-aware route registry over an `axum::Router`.
///
/// Routes are appended during startup; [`into_router`](Self::into_router)
/// consumes the registry, so the route table is read-only once the
/// application serves requests.
///
/// # Example
///
/// ```ignore
/// let mut router = ContractRouter::new(RouterConfig::new().with_validate_responses(true));
/// router
///     .put(RouteDef::new("/api/something/:id").schema(schema).public(), handler)?
///     .get(RouteDef::new("/api/health").public(), health)?;
/// let app = router.into_router();
/// ```
pub struct ContractRouter<S = ()> {
    config: RouterConfig,
    router: Router<S>,
    routes: Vec<Arc<RouteDescriptor>>,
    registered: HashSet<(Method, String)>,
    shapes: HashMap<String, String>,
    consumers: Vec<RouteConsumer<S>>,
    logger: Arc<RequestLogger>,
}

impl<S: Clone + Send + Sync + 'static> ContractRouter<S> {
    pub fn new(config: RouterConfig) -> Self {
        let logger = Arc::new(RequestLogger::new(config.correlation_id.clone()));
        Self {
            config,
            router: Router::new(),
            routes: Vec::new(),
            registered: HashSet::new(),
            shapes: HashMap::new(),
            consumers: Vec::new(),
            logger,
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Every registered route, in registration order.
    pub fn routes(&self) -> &[Arc<RouteDescriptor>] {
        &self.routes
    }

    pub fn get<H, T>(&mut self, def: RouteDef, handler: H) -> Result<&mut Self, RegistryError>
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.route(Method::GET, def, handler)
    }

    pub fn post<H, T>(&mut self, def: RouteDef, handler: H) -> Result<&mut Self, RegistryError>
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.route(Method::POST, def, handler)
    }

    pub fn put<H, T>(&mut self, def: RouteDef, handler: H) -> Result<&mut Self, RegistryError>
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.route(Method::PUT, def, handler)
    }

    pub fn patch<H, T>(&mut self, def: RouteDef, handler: H) -> Result<&mut Self, RegistryError>
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.route(Method::PATCH, def, handler)
    }

    pub fn delete<H, T>(&mut self, def: RouteDef, handler: H) -> Result<&mut Self, RegistryError>
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.route(Method::DELETE, def, handler)
    }

    /// Register `handler` for `method` on the route's URL.
    ///
    /// The middleware chain runs, outermost first: request logging (if
    /// enabled), pre-handlers, request validation, response validation (if
    /// enabled globally and the route declares response schemas), handler.
    pub fn route<H, T>(
        &mut self,
        method: Method,
        def: RouteDef,
        handler: H,
    ) -> Result<&mut Self, RegistryError>
    where
        H: Handler<T, S>,
        T: 'static,
    {
        let filter = MethodFilter::try_from(method.clone())
            .map_err(|_| RegistryError::UnsupportedMethod(method.clone()))?;
        let path = self.claim(&method, &def.url)?;

        let mut endpoint: MethodRouter<S> = on(filter, handler);

        if self.config.validate_responses && !def.schema.responses.is_empty() {
            let validator = Arc::new(ResponseValidator::new(def.schema.responses.clone()));
            endpoint = endpoint.layer(from_fn_with_state(validator, validate_response));
        }

        if let Some(request) = def.schema.request.as_ref().filter(|r| !r.is_empty()) {
            let validator = Arc::new(RequestValidator::new(
                request.clone(),
                def.warn_on_request_validation_error,
            ));
            endpoint = endpoint.layer(from_fn_with_state(validator, validate_request));
        }

        if !def.pre_handlers.is_empty() {
            let chain: PreHandlerChain = Arc::new(def.pre_handlers.clone());
            endpoint = endpoint.layer(from_fn_with_state(chain, run_pre_handlers));
        }

        if self.config.log_requests {
            endpoint = endpoint.layer(from_fn_with_state(self.logger.clone(), log_requests));
        }

        tracing::debug!(%method, url = %def.url, public = def.is_public, "registered route");

        self.routes.push(Arc::new(RouteDescriptor {
            method,
            url: def.url,
            schema: def.schema,
            is_public: def.is_public,
            tags: def.tags,
            summary: def.summary,
            description: def.description,
        }));
        self.router = std::mem::take(&mut self.router).route(&path, endpoint);
        Ok(self)
    }

    /// Serve the raw structural descriptions of `schemas` on `OPTIONS url`,
    /// for client tooling. Not part of the generated API description.
    pub fn expose_schema(
        &mut self,
        url: &str,
        schemas: VerbSchemas,
    ) -> Result<&mut Self, RegistryError> {
        let path = self.claim(&Method::OPTIONS, url)?;
        let body = schemas.describe();
        let endpoint: MethodRouter<S> = on(MethodFilter::OPTIONS, move || {
            let body = body.clone();
            async move { Json(body) }
        });
        self.router = std::mem::take(&mut self.router).route(&path, endpoint);
        Ok(self)
    }

    /// Register a consumer of the final route table. It runs in
    /// [`into_router`](Self::into_router) and its routes are merged into the
    /// application.
    pub fn with_route_consumer<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&Value, &[Arc<RouteDescriptor>]) -> Router<S> + Send + 'static,
    {
        self.consumers.push(Box::new(f));
        self
    }

    /// Install a [`Plugin`].
    pub fn with<P: Plugin>(&mut self, plugin: P) -> &mut Self {
        plugin.install(self);
        self
    }

    /// Assemble the final `axum::Router`: registered routes, consumer routes
    /// and the panic-catching layer.
    pub fn into_router(self) -> Router<S> {
        let base = self.config.swagger_base();
        let mut router = self.router;
        for consumer in self.consumers {
            router = router.merge(consumer(&base, &self.routes));
        }
        router.layer(crate::layers::catch_panic_layer())
    }

    /// Reserve `(method, url)`, returning the axum path for it.
    ///
    /// Paths that only differ by parameter names (`/pets/{id}` and
    /// `/pets/{petId}`) share one axum route, so the first names registered
    /// for a shape win.
    fn claim(&mut self, method: &Method, url: &str) -> Result<String, RegistryError> {
        let path = brace_path(url);
        let shape = path_shape(&path);
        if let Some(existing) = self.shapes.get(&shape).filter(|existing| **existing != path) {
            return Err(RegistryError::ConflictingRoute {
                url: url.to_string(),
                existing: existing.clone(),
            });
        }
        if !self.registered.insert((method.clone(), path.clone())) {
            return Err(RegistryError::DuplicateRoute {
                method: method.clone(),
                url: url.to_string(),
            });
        }
        self.shapes.entry(shape).or_insert_with(|| path.clone());
        Ok(path)
    }
}

/// `path` with every `{param}` segment reduced to `{}`.
fn path_shape(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if segment.starts_with('{') && segment.ends_with('}') {
                "{}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
