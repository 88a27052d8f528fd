//! A [`Schema`] backed by a JSON Schema document.
//!
//! This is the adapter shipped with schemagate. Any other schema language can
//! be plugged in by implementing [`Schema`] directly.

use crate::error::StructuredError;
use crate::schema::Schema;
use jsonschema::error::ValidationErrorKind;
use jsonschema::{ValidationError, Validator};
use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("invalid JSON schema: {0}")]
    InvalidSchema(String),
    #[error("schema serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A compiled JSON Schema document with an optional declared name.
///
/// # Example
///
/// ```ignore
/// let pet = JsonSchemaContract::new(json!({
///     "type": "object",
///     "properties": { "id": { "type": "integer" } },
///     "required": ["id"],
///     "additionalProperties": false
/// }))?
/// .named("Pet");
/// ```
pub struct JsonSchemaContract {
    name: Option<String>,
    document: Value,
    validator: Validator,
    coerce_strings: bool,
}

impl JsonSchemaContract {
    /// Compile a JSON Schema document. A string `name` at the document root
    /// is taken as the declared name.
    pub fn new(document: Value) -> Result<Self, ContractError> {
        let validator = jsonschema::validator_for(&document)
            .map_err(|err| ContractError::InvalidSchema(err.to_string()))?;
        let name = document
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(Self {
            name,
            document,
            validator,
            coerce_strings: false,
        })
    }

    /// Derive the document from a `schemars` type, named after the type.
    pub fn for_type<T: schemars::JsonSchema>() -> Result<Self, ContractError> {
        let schema = schemars::schema_for!(T);
        let document = serde_json::to_value(&schema)?;
        Ok(Self::new(document)?.named(T::schema_name()))
    }

    /// Give this schema a declared name, making it a shared definition in
    /// generated API descriptions.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Parse string values of top-level `integer`, `number` and `boolean`
    /// properties before validating.
    ///
    /// Path and query parameters always arrive as strings; enable this on
    /// schemas used for them.
    pub fn coerce_strings(mut self) -> Self {
        self.coerce_strings = true;
        self
    }

    fn coerce(&self, value: &Value) -> Value {
        let (Some(Value::Object(properties)), Value::Object(input)) =
            (self.document.get("properties"), value)
        else {
            return value.clone();
        };

        let mut out = Map::with_capacity(input.len());
        for (key, v) in input {
            let coerced = match (v, properties.get(key)) {
                (Value::String(raw), Some(prop)) => coerce_scalar(raw, prop),
                _ => None,
            };
            out.insert(key.clone(), coerced.unwrap_or_else(|| v.clone()));
        }
        Value::Object(out)
    }
}

impl Schema for JsonSchemaContract {
    fn validate(&self, value: &Value) -> Vec<StructuredError> {
        if self.coerce_strings {
            let coerced = self.coerce(value);
            collect_errors(&self.validator, &coerced)
        } else {
            collect_errors(&self.validator, value)
        }
    }

    fn describe(&self) -> Value {
        let mut description = self.document.clone();
        if let (Some(name), Some(obj)) = (&self.name, description.as_object_mut()) {
            obj.insert("name".into(), Value::String(name.clone()));
        }
        description
    }

    fn name(&self) -> Option<String> {
        self.name.clone()
    }
}

fn collect_errors(validator: &Validator, value: &Value) -> Vec<StructuredError> {
    validator.iter_errors(value).flat_map(to_structured).collect()
}

fn to_structured(err: ValidationError<'_>) -> Vec<StructuredError> {
    let base = pointer_to_path(&err.instance_path.to_string());
    let message = err.to_string();

    match &err.kind {
        ValidationErrorKind::Required { property } => {
            let property = match property {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            vec![StructuredError::new(join_path(&base, &property), message)]
        }
        ValidationErrorKind::AdditionalProperties { unexpected } => unexpected
            .iter()
            .map(|key| {
                let value = err.instance.get(key).cloned().unwrap_or(Value::Null);
                StructuredError::new(join_path(&base, key), message.clone()).with_value(value)
            })
            .collect(),
        _ => {
            let error = StructuredError::new(base.clone(), message);
            if base.is_empty() {
                vec![error]
            } else {
                vec![error.with_value(err.instance.clone().into_owned())]
            }
        }
    }
}

/// `/items/0/name` -> `items.0.name`
fn pointer_to_path(pointer: &str) -> String {
    pointer
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect::<Vec<_>>()
        .join(".")
}

fn join_path(base: &str, key: &str) -> String {
    if base.is_empty() {
        key.to_string()
    } else {
        format!("{base}.{key}")
    }
}

fn declares_type(prop: &Value, ty: &str) -> bool {
    match prop.get("type") {
        Some(Value::String(t)) => t == ty,
        Some(Value::Array(types)) => types.iter().any(|t| t == ty),
        _ => false,
    }
}

fn coerce_scalar(raw: &str, prop: &Value) -> Option<Value> {
    if declares_type(prop, "integer") {
        if let Ok(n) = raw.parse::<i64>() {
            return Some(Value::from(n));
        }
    }
    if declares_type(prop, "number") {
        if let Ok(n) = raw.parse::<f64>() {
            return serde_json::Number::from_f64(n).map(Value::Number);
        }
    }
    if declares_type(prop, "boolean") {
        if let Ok(b) = raw.parse::<bool>() {
            return Some(Value::Bool(b));
        }
    }
    None
}
