use schemagate_core::prelude::*;
use schemagate_openapi::{build_spec, SwaggerExt};
use serde_json::{json, Value};

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Schema with a fixed description and no validation rules.
struct Described(Value);

impl Schema for Described {
    fn validate(&self, _value: &Value) -> Vec<StructuredError> {
        Vec::new()
    }

    fn describe(&self) -> Value {
        self.0.clone()
    }
}

fn base() -> Value {
    json!({
        "swagger": "2.0",
        "info": {
            "description": "This is my api",
            "version": "1.0.0",
            "title": "My api",
            "termsOfService": null,
            "contact": {"email": "hi@hi.com"},
            "license": {"name": "Apache 2.0", "url": "http://www.apache.org/licenses/LICENSE-2.0.html"}
        },
        "host": "https://myapi.com",
        "basePath": "/",
        "tags": [{"name": "Another tag"}],
        "consumes": ["application/json"],
        "produces": ["application/json"],
        "schemes": ["https"],
        "paths": {},
        "securityDefinitions": {},
        "definitions": {}
    })
}

fn something_schema() -> RouteSchema {
    RouteSchema::new()
        .request(
            RequestSchema::new()
                .query(Described(json!({
                    "type": "object",
                    "properties": {"hello": {"type": "string"}, "world": {"type": "string"}},
                    "required": ["hello", "world"],
                    "additionalProperties": false
                })))
                .params(Described(json!({
                    "type": "object",
                    "properties": {"id": {"type": "integer"}},
                    "required": ["id"],
                    "additionalProperties": false
                })))
                .body(Described(json!({
                    "type": "object",
                    "properties": {"action": {"enum": ["create", "update"]}},
                    "required": ["action"],
                    "additionalProperties": false
                }))),
        )
        .response(
            201,
            Described(json!({
                "type": "object",
                "properties": {"id": {"type": "integer"}},
                "required": ["id"],
                "additionalProperties": false
            })),
        )
}

fn router_with(def: RouteDef) -> ContractRouter {
    let mut router: ContractRouter = ContractRouter::new(RouterConfig::new().with_swagger_base(base()));
    router.put(def, || async { "ok" }).unwrap();
    router
}

// ── Full document ───────────────────────────────────────────────────────────

#[test]
fn full_document_for_public_route() {
    let router = router_with(
        RouteDef::new("/api/something/:id")
            .schema(something_schema())
            .public()
            .tag("Something")
            .summary("This route is about something")
            .description("This route does something"),
    );

    assert_eq!(
        router.to_swagger(),
        json!({
            "swagger": "2.0",
            "info": {
                "description": "This is my api",
                "version": "1.0.0",
                "title": "My api",
                "termsOfService": null,
                "contact": {"email": "hi@hi.com"},
                "license": {"name": "Apache 2.0", "url": "http://www.apache.org/licenses/LICENSE-2.0.html"}
            },
            "host": "https://myapi.com",
            "basePath": "/",
            "tags": [{"name": "Another tag"}, {"name": "Something"}],
            "consumes": ["application/json"],
            "produces": ["application/json"],
            "schemes": ["https"],
            "paths": {
                "/api/something/{id}": {
                    "put": {
                        "tags": ["Something"],
                        "summary": "This route is about something",
                        "description": "This route does something",
                        "responses": {
                            "201": {
                                "schema": {
                                    "type": "object",
                                    "properties": {"id": {"type": "integer"}},
                                    "required": ["id"],
                                    "additionalProperties": false
                                },
                                "description": "201 response"
                            }
                        },
                        "parameters": [
                            {"name": "id", "in": "path", "required": true, "type": "integer"},
                            {"name": "hello", "in": "query", "required": true, "type": "string"},
                            {"name": "world", "in": "query", "required": true, "type": "string"},
                            {
                                "name": "payload",
                                "in": "body",
                                "required": true,
                                "schema": {
                                    "type": "object",
                                    "properties": {"action": {"enum": ["create", "update"]}},
                                    "required": ["action"],
                                    "additionalProperties": false
                                }
                            }
                        ]
                    }
                }
            },
            "securityDefinitions": {},
            "definitions": {}
        })
    );
}

#[test]
fn private_route_gets_api_key_header_first() {
    let router = router_with(RouteDef::new("/api/something/:id").schema(something_schema()));
    let spec = router.to_swagger();
    let params = spec["paths"]["/api/something/{id}"]["put"]["parameters"]
        .as_array()
        .unwrap();
    assert_eq!(params.len(), 5);
    assert_eq!(
        params[0],
        json!({
            "name": "X-API-KEY",
            "in": "header",
            "description": "API Key header",
            "required": true,
            "default": "{{token}}",
            "type": "string"
        })
    );
    assert_eq!(params[1]["name"], "id");
}

// ── Definitions ─────────────────────────────────────────────────────────────

#[test]
fn named_body_and_response_are_hoisted() {
    let pet = || {
        Described(json!({
            "name": "Pet",
            "type": "object",
            "properties": {
                "id": {"type": "integer"},
                "owner": {"name": "Owner", "type": "object", "properties": {"email": {"type": "string"}}},
                "toys": {"type": "array", "items": {"name": "Toy", "type": "object"}}
            }
        }))
    };
    let def = RouteDef::new("/pets")
        .public()
        .schema(
            RouteSchema::new()
                .request(RequestSchema::new().body(pet()))
                .response(200, Described(json!({"type": "array", "items": pet().0}))),
        );
    let spec = router_with(def).to_swagger();
    let op = &spec["paths"]["/pets"]["put"];

    assert_eq!(
        op["parameters"][0],
        json!({"name": "Pet", "in": "body", "required": true, "schema": {"$ref": "#/definitions/Pet"}})
    );
    assert_eq!(
        op["responses"]["200"]["schema"],
        json!({"type": "array", "items": {"$ref": "#/definitions/Pet"}})
    );
    assert_eq!(
        spec["definitions"],
        json!({
            "Pet": {
                "type": "object",
                "properties": {
                    "id": {"type": "integer"},
                    "owner": {"$ref": "#/definitions/Owner"},
                    "toys": {"type": "array", "items": {"$ref": "#/definitions/Toy"}}
                }
            },
            "Owner": {"type": "object", "properties": {"email": {"type": "string"}}},
            "Toy": {"type": "object"}
        })
    );
}

#[test]
fn unnamed_body_keeps_nested_refs_inline() {
    let def = RouteDef::new("/batch").public().schema(RouteSchema::new().request(
        RequestSchema::new().body(Described(json!({
            "type": "object",
            "properties": {"item": {"name": "Item", "type": "object"}}
        }))),
    ));
    let spec = router_with(def).to_swagger();
    let body = &spec["paths"]["/batch"]["put"]["parameters"][0];
    assert_eq!(body["name"], "payload");
    assert_eq!(body["schema"]["properties"]["item"], json!({"$ref": "#/definitions/Item"}));
    assert_eq!(spec["definitions"]["Item"], json!({"type": "object"}));
}

#[derive(schemars::JsonSchema)]
#[allow(dead_code)]
struct Toy {
    kind: String,
}

#[derive(schemars::JsonSchema)]
#[allow(dead_code)]
struct Kennel {
    name: String,
    toys: Vec<Toy>,
}

#[test]
fn derived_schemas_promote_defs() {
    let contract = JsonSchemaContract::for_type::<Kennel>().unwrap();
    let def = RouteDef::new("/kennels")
        .public()
        .schema(RouteSchema::new().request(RequestSchema::new().body(contract)));
    let spec = router_with(def).to_swagger();

    let body = &spec["paths"]["/kennels"]["put"]["parameters"][0];
    assert_eq!(body["name"], "Kennel");
    assert_eq!(body["schema"], json!({"$ref": "#/definitions/Kennel"}));

    let kennel = &spec["definitions"]["Kennel"];
    assert!(kennel.get("$schema").is_none());
    assert!(kennel.get("$defs").is_none());
    assert!(kennel.get("name").is_none());
    assert_eq!(kennel["properties"]["toys"]["items"], json!({"$ref": "#/definitions/Toy"}));
    assert_eq!(spec["definitions"]["Toy"]["properties"]["kind"]["type"], "string");
}

// ── Paths and tags ──────────────────────────────────────────────────────────

#[test]
fn methods_share_a_path_entry() {
    let mut router: ContractRouter = ContractRouter::new(RouterConfig::new());
    router
        .get(RouteDef::new("/pets/:id").tag("Pets"), || async { "" })
        .unwrap()
        .delete(RouteDef::new("/pets/:id").tags(["Pets", "Admin"]), || async { "" })
        .unwrap();
    let spec = router.to_swagger();
    let entry = spec["paths"]["/pets/{id}"].as_object().unwrap();
    assert!(entry.contains_key("get"));
    assert!(entry.contains_key("delete"));
    assert_eq!(spec["tags"], json!([{"name": "Pets"}, {"name": "Admin"}]));
}

#[test]
fn operation_defaults_are_empty() {
    let spec = router_with(RouteDef::new("/bare").public()).to_swagger();
    assert_eq!(
        spec["paths"]["/bare"]["put"],
        json!({"tags": [], "summary": "", "description": "", "responses": {}, "parameters": []})
    );
}

#[test]
fn empty_base_yields_computed_sections_only() {
    let spec = build_spec(&json!({}), &[]);
    assert_eq!(spec, json!({"paths": {}, "definitions": {}, "tags": []}));
}
