//! The two-operation contract every schema object must honour.
//!
//! The core never looks inside a schema. Validation calls
//! [`Schema::validate`], description generation calls [`Schema::describe`],
//! and that is all.

use crate::error::StructuredError;
use serde_json::Value;
use std::sync::Arc;

/// A schema object consumed by the validation stages and the description
/// generator.
///
/// `describe` returns a JSON-Schema-shaped tree
/// (`{type, properties?, required?, items?, enum?, format?, description?,
/// additionalProperties?, name?}`). A schema that should be shared as a named
/// definition carries its name in the root `name` field; nested schemas may
/// carry their own `name` too.
pub trait Schema: Send + Sync + 'static {
    /// Validate a candidate value. An empty list means valid.
    fn validate(&self, value: &Value) -> Vec<StructuredError>;

    /// Structural description of this schema.
    fn describe(&self) -> Value;

    /// Declared name of this schema, if any.
    fn name(&self) -> Option<String> {
        self.describe()
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

/// Schemas are shared between the route table and the middleware stack.
pub type SharedSchema = Arc<dyn Schema>;
