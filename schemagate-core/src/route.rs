use crate::error::HttpError;
use crate::http::extract::{Request, State};
use crate::http::middleware::Next;
use crate::http::response::Response;
use crate::http::Parts;
use crate::meta::RouteSchema;
use futures_util::future::BoxFuture;
use std::sync::Arc;

/// A hook that runs before request validation.
///
/// Pre-handlers see the request head and may enrich it (e.g. insert an
/// extension) or reject the request with an [`HttpError`].
///
/// Plain closures `Fn(&mut Parts) -> Result<(), HttpError>` implement this
/// trait; implement it by hand for asynchronous checks:
///
/// ```ignore
/// struct RequireTenant;
///
/// impl PreHandler for RequireTenant {
///     fn call<'a>(&'a self, parts: &'a mut Parts) -> BoxFuture<'a, Result<(), HttpError>> {
///         Box::pin(async move {
///             parts.headers.get("x-tenant").ok_or_else(|| HttpError::forbidden("no tenant"))?;
///             Ok(())
///         })
///     }
/// }
/// ```
pub trait PreHandler: Send + Sync + 'static {
    fn call<'a>(&'a self, parts: &'a mut Parts) -> BoxFuture<'a, Result<(), HttpError>>;
}

impl<F> PreHandler for F
where
    F: Fn(&mut Parts) -> Result<(), HttpError> + Send + Sync + 'static,
{
    fn call<'a>(&'a self, parts: &'a mut Parts) -> BoxFuture<'a, Result<(), HttpError>> {
        let result = self(parts);
        Box::pin(async move { result })
    }
}

pub(crate) type PreHandlerChain = Arc<Vec<Arc<dyn PreHandler>>>;

/// Run the pre-handlers in order; the first failure stops the chain.
pub(crate) async fn run_pre_handlers(
    State(chain): State<PreHandlerChain>,
    req: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let (mut parts, body) = req.into_parts();
    for handler in chain.iter() {
        handler.call(&mut parts).await?;
    }
    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Declaration of a route: URL, contract, documentation metadata and
/// per-route options.
///
/// Routes are private unless marked [`public`](Self::public).
///
/// # Example
///
/// ```ignore
/// RouteDef::new("/api/pets/:id")
///     .schema(RouteSchema::new().request(RequestSchema::new().params(id_schema)))
///     .public()
///     .tag("Pets")
///     .summary("Fetch a pet")
/// ```
#[derive(Clone)]
pub struct RouteDef {
    pub(crate) url: String,
    pub(crate) schema: RouteSchema,
    pub(crate) is_public: bool,
    pub(crate) tags: Vec<String>,
    pub(crate) summary: String,
    pub(crate) description: String,
    pub(crate) pre_handlers: Vec<Arc<dyn PreHandler>>,
    pub(crate) warn_on_request_validation_error: bool,
}

impl RouteDef {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            schema: RouteSchema::default(),
            is_public: false,
            tags: Vec::new(),
            summary: String::new(),
            description: String::new(),
            pre_handlers: Vec::new(),
            warn_on_request_validation_error: false,
        }
    }

    pub fn schema(mut self, schema: RouteSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Mark the route as public: it is documented without the API-key header.
    pub fn public(mut self) -> Self {
        self.is_public = true;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a hook that runs before request validation.
    pub fn pre_handler(mut self, handler: impl PreHandler) -> Self {
        self.pre_handlers.push(Arc::new(handler));
        self
    }

    /// Log request validation failures as warnings instead of rejecting the
    /// request. The handler then receives the unvalidated input.
    pub fn warn_on_request_validation_error(mut self, warn: bool) -> Self {
        self.warn_on_request_validation_error = warn;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}
