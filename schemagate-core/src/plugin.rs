use crate::registry::ContractRouter;

/// A composable unit of functionality that can be installed into a
/// [`ContractRouter`] with [`ContractRouter::with`].
///
/// Plugins typically register a route-table consumer that mounts extra
/// endpoints once every route is known, e.g. a documentation browser.
///
/// # Example
///
/// ```ignore
/// pub struct RouteCount;
///
/// impl Plugin for RouteCount {
///     fn install<S: Clone + Send + Sync + 'static>(self, router: &mut ContractRouter<S>) {
///         router.with_route_consumer(|_base, routes| {
///             let count = routes.len();
///             Router::new().route("/routes/count", get(move || async move { count.to_string() }))
///         });
///     }
/// }
/// ```
pub trait Plugin: Send + 'static {
    fn install<S: Clone + Send + Sync + 'static>(self, router: &mut ContractRouter<S>);
}
