use crate::models::{NewPet, Pet, PetId, PetQuery};
use crate::store::PetStore;
use schemagate::http::extract::{Path, Query};
use schemagate::http::Parts;
use schemagate::prelude::*;
use schemars::JsonSchema;
use std::sync::Arc;

/// Reject requests whose `X-API-KEY` header does not match `key`.
fn require_api_key(key: Arc<str>) -> impl Fn(&mut Parts) -> Result<(), HttpError> + Send + Sync + 'static {
    move |parts: &mut Parts| {
        let given = parts.headers.get("x-api-key").and_then(|v| v.to_str().ok());
        if given == Some(&*key) {
            Ok(())
        } else {
            Err(HttpError::unauthorized("Missing or invalid API key"))
        }
    }
}

fn contract<T: JsonSchema>() -> anyhow::Result<JsonSchemaContract> {
    Ok(JsonSchemaContract::for_type::<T>()?)
}

/// Unnamed array schema; its `Pet` items end up as a shared definition.
fn list_schema() -> anyhow::Result<JsonSchemaContract> {
    let document = serde_json::to_value(schemars::schema_for!(Vec<Pet>))?;
    Ok(JsonSchemaContract::new(document)?)
}

async fn list_pets(
    State(store): State<PetStore>,
    Query(query): Query<PetQuery>,
) -> Json<Vec<Pet>> {
    let limit = query.limit.map(|l| l as usize);
    Json(store.list(query.kind, limit).await)
}

async fn get_pet(State(store): State<PetStore>, Path(id): Path<u64>) -> Result<Json<Pet>, HttpError> {
    store
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| HttpError::not_found(format!("Pet {id} not found")))
}

async fn create_pet(State(store): State<PetStore>, Json(new): Json<NewPet>) -> (StatusCode, Json<Pet>) {
    let pet = store.create(new).await;
    tracing::info!(id = pet.id, name = %pet.name, "pet created");
    (StatusCode::CREATED, Json(pet))
}

async fn update_pet(
    State(store): State<PetStore>,
    Path(id): Path<u64>,
    Json(new): Json<NewPet>,
) -> Result<Json<Pet>, HttpError> {
    store
        .update(id, new)
        .await
        .map(Json)
        .ok_or_else(|| HttpError::not_found(format!("Pet {id} not found")))
}

async fn delete_pet(State(store): State<PetStore>, Path(id): Path<u64>) -> Result<StatusCode, HttpError> {
    match store.remove(id).await {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(HttpError::not_found(format!("Pet {id} not found"))),
    }
}

/// Register every petstore route on a fresh router.
pub fn pet_routes(config: RouterConfig, api_key: &str) -> anyhow::Result<ContractRouter<PetStore>> {
    let key: Arc<str> = Arc::from(api_key);
    let pet_id = || -> anyhow::Result<RequestSchema> {
        Ok(RequestSchema::new().params(contract::<PetId>()?.coerce_strings()))
    };

    let mut router = ContractRouter::new(config);
    router
        .get(
            RouteDef::new("/pets")
                .public()
                .tag("Pets")
                .summary("List pets")
                .schema(
                    RouteSchema::new()
                        .request(RequestSchema::new().query(contract::<PetQuery>()?.coerce_strings()))
                        .response(200, list_schema()?),
                ),
            list_pets,
        )?
        .post(
            RouteDef::new("/pets")
                .tag("Pets")
                .summary("Register a pet")
                .pre_handler(require_api_key(key.clone()))
                .schema(
                    RouteSchema::new()
                        .request(RequestSchema::new().body(contract::<NewPet>()?))
                        .response(201, contract::<Pet>()?),
                ),
            create_pet,
        )?
        .get(
            RouteDef::new("/pets/:id")
                .public()
                .tag("Pets")
                .summary("Fetch a pet")
                .schema(RouteSchema::new().request(pet_id()?).response(200, contract::<Pet>()?)),
            get_pet,
        )?
        .put(
            RouteDef::new("/pets/:id")
                .tag("Pets")
                .summary("Replace a pet")
                .pre_handler(require_api_key(key.clone()))
                .schema(
                    RouteSchema::new()
                        .request(pet_id()?.body(contract::<NewPet>()?))
                        .response(200, contract::<Pet>()?),
                ),
            update_pet,
        )?
        .delete(
            RouteDef::new("/pets/:id")
                .tag("Pets")
                .tag("Admin")
                .summary("Remove a pet")
                .pre_handler(require_api_key(key))
                .schema(RouteSchema::new().request(pet_id()?)),
            delete_pet,
        )?
        .expose_schema(
            "/pets/:id",
            VerbSchemas::new()
                .get(pet_id()?)
                .put(pet_id()?.body(contract::<NewPet>()?)),
        )?;
    router.serve_docs("/docs");
    Ok(router)
}

/// The complete application over `store`.
pub fn app(config: RouterConfig, api_key: &str, store: PetStore) -> anyhow::Result<Router> {
    Ok(pet_routes(config, api_key)?.into_router().with_state(store))
}
