use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use schemagate_core::prelude::*;
use schemagate_core::{RegistryError, StructuredError};
use serde_json::{json, Value};
use tower::ServiceExt;

struct Named(&'static str);

impl Schema for Named {
    fn validate(&self, _value: &Value) -> Vec<StructuredError> {
        Vec::new()
    }

    fn describe(&self) -> Value {
        json!({"type": "object", "name": self.0})
    }
}

async fn ok() -> &'static str {
    "ok"
}

#[test]
fn duplicate_route_is_rejected() {
    let mut router: ContractRouter = ContractRouter::new(RouterConfig::new());
    router.get(RouteDef::new("/pets/:id"), ok).unwrap();
    let err = router.get(RouteDef::new("/pets/{id}"), ok).err().unwrap();
    assert!(matches!(err, RegistryError::DuplicateRoute { ref method, .. } if *method == Method::GET));
    assert_eq!(err.to_string(), "Route already defined: (GET) /pets/{id}");
}

#[test]
fn same_url_different_methods_allowed() {
    let mut router: ContractRouter = ContractRouter::new(RouterConfig::new());
    router
        .get(RouteDef::new("/pets/:id"), ok)
        .unwrap()
        .put(RouteDef::new("/pets/:id"), ok)
        .unwrap()
        .delete(RouteDef::new("/pets/:id"), ok)
        .unwrap();
    assert_eq!(router.routes().len(), 3);
}

#[test]
fn renamed_param_on_same_shape_is_a_conflict() {
    let mut router: ContractRouter = ContractRouter::new(RouterConfig::new());
    router.get(RouteDef::new("/pets/:id"), ok).unwrap();
    let err = router.delete(RouteDef::new("/pets/:petId"), ok).err().unwrap();
    assert!(matches!(
        err,
        RegistryError::ConflictingRoute { ref url, ref existing }
            if url == "/pets/:petId" && existing == "/pets/{id}"
    ));
    assert_eq!(router.routes().len(), 1);

    // the rejected claim leaves the method free for the original names
    router.delete(RouteDef::new("/pets/:id"), ok).unwrap();
    router.get(RouteDef::new("/pets/:id/toys/:toy"), ok).unwrap();
    router.get(RouteDef::new("/owners/:petId"), ok).unwrap();
    assert_eq!(router.routes().len(), 4);
}

#[test]
fn routes_keep_registration_order_and_metadata() {
    let mut router: ContractRouter = ContractRouter::new(RouterConfig::new());
    router
        .post(RouteDef::new("/b").public().tag("B").summary("Create b"), ok)
        .unwrap()
        .get(RouteDef::new("/a").tags(["A", "Shared"]).description("Read a"), ok)
        .unwrap();

    let routes = router.routes();
    assert_eq!(routes[0].method, Method::POST);
    assert_eq!(routes[0].url, "/b");
    assert!(routes[0].is_public);
    assert_eq!(routes[0].tags, vec!["B"]);
    assert_eq!(routes[0].summary, "Create b");
    assert_eq!(routes[1].url, "/a");
    assert!(!routes[1].is_public);
    assert_eq!(routes[1].tags, vec!["A", "Shared"]);
    assert_eq!(routes[1].description, "Read a");
}

#[tokio::test]
async fn colon_params_are_routed() {
    let mut router: ContractRouter = ContractRouter::new(RouterConfig::new());
    router
        .patch(
            RouteDef::new("/pets/:id/toys/:toy"),
            |axum::extract::Path((id, toy)): axum::extract::Path<(u32, String)>| async move {
                format!("{id}:{toy}")
            },
        )
        .unwrap();
    let req = Request::builder()
        .method("PATCH")
        .uri("/pets/4/toys/ball")
        .body(Body::empty())
        .unwrap();
    let resp = router.into_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"4:ball");
}

#[tokio::test]
async fn expose_schema_serves_descriptions_on_options() {
    let mut router: ContractRouter = ContractRouter::new(RouterConfig::new());
    router
        .expose_schema(
            "/pets/:id",
            VerbSchemas::new()
                .get(RequestSchema::new().params(Named("PetId")))
                .put(RequestSchema::new().params(Named("PetId")).body(Named("Pet"))),
        )
        .unwrap();
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/pets/1")
        .body(Body::empty())
        .unwrap();
    let resp = router.into_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        body,
        json!({
            "get": {"params": {"type": "object", "name": "PetId"}},
            "put": {
                "params": {"type": "object", "name": "PetId"},
                "body": {"type": "object", "name": "Pet"}
            }
        })
    );
}

#[test]
fn expose_schema_twice_is_a_duplicate() {
    let mut router: ContractRouter = ContractRouter::new(RouterConfig::new());
    router.expose_schema("/pets", VerbSchemas::new()).unwrap();
    assert!(router.expose_schema("/pets", VerbSchemas::new()).is_err());
}

#[tokio::test]
async fn route_consumer_sees_every_route() {
    let mut router: ContractRouter = ContractRouter::new(
        RouterConfig::new().with_swagger_base(json!({"info": {"title": "t"}})),
    );
    router
        .get(RouteDef::new("/one"), ok)
        .unwrap()
        .post(RouteDef::new("/two"), ok)
        .unwrap();
    router.with_route_consumer(|base, routes| {
        let summary = format!("{}:{}", base["info"]["title"].as_str().unwrap_or(""), routes.len());
        axum::Router::new().route("/count", axum::routing::get(move || async move { summary }))
    });
    let req = Request::builder().uri("/count").body(Body::empty()).unwrap();
    let resp = router.into_router().oneshot(req).await.unwrap();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"t:2");
}

struct Ping;

impl Plugin for Ping {
    fn install<S: Clone + Send + Sync + 'static>(self, router: &mut ContractRouter<S>) {
        router.with_route_consumer(|_base, _routes| {
            axum::Router::new().route("/ping", axum::routing::get(|| async { "pong" }))
        });
    }
}

#[tokio::test]
async fn plugin_installs_routes() {
    let mut router: ContractRouter = ContractRouter::new(RouterConfig::new());
    router.with(Ping);
    let req = Request::builder().uri("/ping").body(Body::empty()).unwrap();
    let resp = router.into_router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
