use schemagate_core::meta::{brace_path, RouteDescriptor};
use schemagate_core::SharedSchema;
use serde_json::{json, Map, Value};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

const DEFS_REF_PREFIX: &str = "#/$defs/";
const DEFINITIONS_REF_PREFIX: &str = "#/definitions/";

/// Keywords holding a subschema or an array of subschemas. Literal-data
/// keywords (`default`, `enum`, `const`, `examples`) are never traversed.
const SUBSCHEMA_KEYWORDS: &[&str] = &[
    "allOf",
    "anyOf",
    "oneOf",
    "not",
    "if",
    "then",
    "else",
    "additionalProperties",
    "additionalItems",
    "contains",
    "propertyNames",
];

/// Keywords holding an object whose values are subschemas.
const SCHEMA_MAP_KEYWORDS: &[&str] = &["patternProperties", "definitions", "dependencies"];

/// Parameter documenting the API-key header on non-public routes.
fn api_key_header() -> Value {
    json!({
        "name": "X-API-KEY",
        "in": "header",
        "description": "API Key header",
        "required": true,
        "default": "{{token}}",
        "type": "string"
    })
}

/// Collects hoisted schemas into the `definitions` section.
///
/// Named schemas are queued the first time their name is seen and processed
/// one at a time, so self-referencing or mutually-referencing schemas
/// terminate and the first definition of a name wins.
#[derive(Default)]
struct Definitions {
    done: Map<String, Value>,
    seen: HashSet<String>,
    pending: VecDeque<(String, Value)>,
}

impl Definitions {
    /// Queue `schema` under `name` and return a reference to it.
    fn hoist(&mut self, name: &str, schema: Value) -> Value {
        if self.seen.insert(name.to_string()) {
            self.pending.push_back((name.to_string(), schema));
        }
        json!({ "$ref": format!("{DEFINITIONS_REF_PREFIX}{name}") })
    }

    /// Hoist a root schema if it is named, otherwise lift its nested named
    /// schemas in place.
    fn root(&mut self, mut schema: Value) -> Value {
        match schema_name(&schema) {
            Some(name) => self.hoist(&name, schema),
            None => {
                self.lift(&mut schema);
                schema
            }
        }
    }

    /// Replace named schemas under `items` and `properties` with references,
    /// promote `$defs` and rewrite `$defs` references, anywhere in `root`.
    fn lift(&mut self, root: &mut Value) {
        let mut stack: Vec<&mut Value> = vec![root];
        while let Some(node) = stack.pop() {
            match node {
                Value::Object(obj) => {
                    obj.remove("$schema");
                    if let Some(Value::Object(defs)) = obj.remove("$defs") {
                        for (name, def) in defs {
                            self.hoist(&name, def);
                        }
                    }
                    for (key, child) in obj.iter_mut() {
                        match (key.as_str(), child) {
                            ("$ref", Value::String(reference)) => {
                                if let Some(name) = reference.strip_prefix(DEFS_REF_PREFIX) {
                                    *reference = format!("{DEFINITIONS_REF_PREFIX}{name}");
                                }
                            }
                            ("properties", Value::Object(props)) => {
                                for prop in props.values_mut() {
                                    if let Some(next) = self.slot(prop) {
                                        stack.push(next);
                                    }
                                }
                            }
                            ("items", Value::Array(items)) => {
                                for item in items.iter_mut() {
                                    if let Some(next) = self.slot(item) {
                                        stack.push(next);
                                    }
                                }
                            }
                            ("items", item) => {
                                if let Some(next) = self.slot(item) {
                                    stack.push(next);
                                }
                            }
                            (key, other) => {
                                if SCHEMA_MAP_KEYWORDS.contains(&key) && other.is_object() {
                                    if let Value::Object(schemas) = other {
                                        stack.extend(schemas.values_mut());
                                    }
                                } else if SUBSCHEMA_KEYWORDS.contains(&key) {
                                    stack.push(other);
                                }
                            }
                        }
                    }
                }
                Value::Array(values) => stack.extend(values.iter_mut()),
                _ => {}
            }
        }
    }

    /// A subschema position: named schemas are hoisted, anything else is
    /// handed back for further traversal.
    fn slot<'a>(&mut self, value: &'a mut Value) -> Option<&'a mut Value> {
        match schema_name(value) {
            Some(name) => {
                let schema = std::mem::take(value);
                *value = self.hoist(&name, schema);
                None
            }
            None => Some(value),
        }
    }

    /// Drain the queue; each definition is stripped of its name and lifted
    /// before it is stored.
    fn finish(mut self) -> Map<String, Value> {
        while let Some((name, mut schema)) = self.pending.pop_front() {
            if let Some(obj) = schema.as_object_mut() {
                obj.remove("name");
            }
            self.lift(&mut schema);
            self.done.insert(name, schema);
        }
        self.done
    }
}

fn schema_name(schema: &Value) -> Option<String> {
    schema.get("name").and_then(Value::as_str).map(str::to_string)
}

/// Flatten the properties of a params/query description into parameters.
fn to_parameters(description: &Value, location: &str) -> Vec<Value> {
    let Some(properties) = description.get("properties").and_then(Value::as_object) else {
        return Vec::new();
    };
    let required: HashSet<&str> = description
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    properties
        .iter()
        .map(|(name, property)| {
            let mut param = Map::new();
            param.insert("name".into(), json!(name));
            param.insert("in".into(), json!(location));
            param.insert("required".into(), json!(required.contains(name.as_str())));
            for key in ["type", "format", "description", "enum"] {
                if let Some(value) = property.get(key) {
                    param.insert(key.into(), value.clone());
                }
            }
            Value::Object(param)
        })
        .collect()
}

fn body_parameter(schema: &SharedSchema, definitions: &mut Definitions) -> Value {
    let name = schema.name().unwrap_or_else(|| "payload".to_string());
    json!({
        "name": name,
        "in": "body",
        "required": true,
        "schema": definitions.root(schema.describe()),
    })
}

fn operation(route: &RouteDescriptor, definitions: &mut Definitions) -> Value {
    let mut parameters = Vec::new();
    if !route.is_public {
        parameters.push(api_key_header());
    }
    if let Some(request) = &route.schema.request {
        if let Some(params) = &request.params {
            parameters.extend(to_parameters(&params.describe(), "path"));
        }
        if let Some(query) = &request.query {
            parameters.extend(to_parameters(&query.describe(), "query"));
        }
        if let Some(body) = &request.body {
            parameters.push(body_parameter(body, definitions));
        }
    }

    let mut responses = Map::new();
    for (status, schema) in &route.schema.responses {
        responses.insert(
            status.to_string(),
            json!({
                "schema": definitions.root(schema.describe()),
                "description": format!("{status} response"),
            }),
        );
    }

    json!({
        "tags": route.tags,
        "summary": route.summary,
        "description": route.description,
        "responses": responses,
        "parameters": parameters,
    })
}

/// Build the Swagger 2.0 description of `routes` on top of `base`.
///
/// `paths`, `definitions` and `tags` are computed; every other field of
/// `base` is copied as-is. Base tags keep their position and route tags
/// missing from them are appended in first-seen order.
pub fn build_spec(base: &Value, routes: &[Arc<RouteDescriptor>]) -> Value {
    let mut definitions = Definitions::default();
    let mut paths: Map<String, Value> = Map::new();

    let mut tags: Vec<Value> = base
        .get("tags")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let mut known_tags: HashSet<String> = tags
        .iter()
        .filter_map(|tag| tag.get("name").and_then(Value::as_str))
        .map(str::to_string)
        .collect();

    for route in routes {
        let op = operation(route, &mut definitions);
        let entry = paths
            .entry(brace_path(&route.url))
            .or_insert_with(|| Value::Object(Map::new()));
        if let Some(methods) = entry.as_object_mut() {
            methods.insert(route.method.as_str().to_lowercase(), op);
        }

        for tag in &route.tags {
            if known_tags.insert(tag.clone()) {
                tags.push(json!({ "name": tag }));
            }
        }
    }

    let mut spec = match base {
        Value::Object(obj) => obj.clone(),
        _ => Map::new(),
    };
    spec.insert("paths".into(), Value::Object(paths));
    spec.insert("definitions".into(), Value::Object(definitions.finish()));
    spec.insert("tags".into(), Value::Array(tags));
    Value::Object(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_named_items_are_hoisted() {
        let mut defs = Definitions::default();
        let root = defs.root(json!({
            "type": "array",
            "items": {"name": "Pet", "type": "object", "properties": {"id": {"type": "integer"}}}
        }));
        assert_eq!(root["items"], json!({"$ref": "#/definitions/Pet"}));
        let done = defs.finish();
        assert_eq!(
            done["Pet"],
            json!({"type": "object", "properties": {"id": {"type": "integer"}}})
        );
    }

    #[test]
    fn first_definition_wins() {
        let mut defs = Definitions::default();
        defs.root(json!({"name": "Pet", "type": "object", "title": "first"}));
        defs.root(json!({"name": "Pet", "type": "object", "title": "second"}));
        assert_eq!(defs.finish()["Pet"]["title"], "first");
    }

    #[test]
    fn self_reference_terminates() {
        let mut defs = Definitions::default();
        defs.root(json!({
            "name": "Node",
            "type": "object",
            "properties": {"children": {"type": "array", "items": {"name": "Node", "type": "object"}}}
        }));
        let done = defs.finish();
        assert_eq!(done.len(), 1);
        assert_eq!(
            done["Node"]["properties"]["children"]["items"],
            json!({"$ref": "#/definitions/Node"})
        );
    }

    #[test]
    fn defs_are_promoted_and_refs_rewritten() {
        let mut defs = Definitions::default();
        let root = defs.root(json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "type": "object",
            "properties": {"toy": {"$ref": "#/$defs/Toy"}},
            "$defs": {"Toy": {"type": "object", "properties": {"kind": {"type": "string"}}}}
        }));
        assert!(root.get("$schema").is_none());
        assert!(root.get("$defs").is_none());
        assert_eq!(root["properties"]["toy"], json!({"$ref": "#/definitions/Toy"}));
        assert_eq!(
            defs.finish()["Toy"],
            json!({"type": "object", "properties": {"kind": {"type": "string"}}})
        );
    }

    #[test]
    fn literal_values_are_left_untouched() {
        let literal = json!({"properties": {"x": {"name": "Alice", "type": "string"}}});
        let mut defs = Definitions::default();
        let root = defs.root(json!({
            "type": "object",
            "properties": {
                "owner": {"type": "object", "default": literal.clone()},
                "kind": {"enum": [{"name": "cat"}], "examples": [{"name": "dog"}], "const": {"name": "x"}}
            }
        }));
        assert_eq!(root["properties"]["owner"]["default"], literal);
        assert_eq!(root["properties"]["kind"]["enum"], json!([{"name": "cat"}]));
        assert_eq!(root["properties"]["kind"]["examples"], json!([{"name": "dog"}]));
        assert_eq!(root["properties"]["kind"]["const"], json!({"name": "x"}));
        assert!(defs.finish().is_empty());
    }

    #[test]
    fn combinator_branches_are_traversed() {
        let mut defs = Definitions::default();
        let root = defs.root(json!({
            "anyOf": [
                {"$ref": "#/$defs/Toy"},
                {"type": "object", "properties": {"pet": {"name": "Pet", "type": "object"}}}
            ]
        }));
        assert_eq!(root["anyOf"][0], json!({"$ref": "#/definitions/Toy"}));
        assert_eq!(root["anyOf"][1]["properties"]["pet"], json!({"$ref": "#/definitions/Pet"}));
        assert!(defs.finish().contains_key("Pet"));
    }

    #[test]
    fn parameters_copy_known_keys() {
        let params = to_parameters(
            &json!({
                "type": "object",
                "properties": {
                    "kind": {"type": "string", "enum": ["cat", "dog"], "description": "Kind", "minLength": 1},
                    "at": {"type": "string", "format": "date-time"}
                },
                "required": ["kind"]
            }),
            "query",
        );
        let kind = params.iter().find(|p| p["name"] == "kind").unwrap();
        assert_eq!(
            kind,
            &json!({
                "name": "kind", "in": "query", "required": true, "type": "string",
                "enum": ["cat", "dog"], "description": "Kind"
            })
        );
        let at = params.iter().find(|p| p["name"] == "at").unwrap();
        assert_eq!(at["required"], false);
        assert_eq!(at["format"], "date-time");
    }

    #[test]
    fn description_without_properties_has_no_parameters() {
        assert!(to_parameters(&json!({"type": "string"}), "path").is_empty());
    }
}
