//! Router configuration.
//!
//! [`RouterConfig`] is built in code with the `with_*` methods, or loaded
//! from YAML:
//!
//! ```yaml
//! validate_responses: true
//! log_requests: true
//! swagger_base_properties:
//!   swagger: "2.0"
//!   info:
//!     title: My api
//!     version: 1.0.0
//!   tags:
//!     - name: Another tag
//! ```

use crate::http::Parts;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Derives a correlation id for request logging from the request head.
pub type CorrelationIdExtractor = Arc<dyn Fn(&Parts) -> String + Send + Sync>;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid router config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Settings recognised when a [`ContractRouter`](crate::ContractRouter) is
/// constructed.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Check handler responses against their declared schemas.
    pub validate_responses: bool,
    /// Log every request and response with a correlation id.
    pub log_requests: bool,
    /// Base document for the generated API description. Everything except
    /// `paths`, `definitions` and `tags` is passed through verbatim.
    pub swagger_base_properties: Value,
    /// Correlation id source for request logging; a UUID v4 when unset.
    #[serde(skip)]
    pub correlation_id: Option<CorrelationIdExtractor>,
}

impl RouterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a config from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn with_validate_responses(mut self, enabled: bool) -> Self {
        self.validate_responses = enabled;
        self
    }

    pub fn with_log_requests(mut self, enabled: bool) -> Self {
        self.log_requests = enabled;
        self
    }

    pub fn with_swagger_base(mut self, base: Value) -> Self {
        self.swagger_base_properties = base;
        self
    }

    pub fn with_correlation_id<F>(mut self, extractor: F) -> Self
    where
        F: Fn(&Parts) -> String + Send + Sync + 'static,
    {
        self.correlation_id = Some(Arc::new(extractor));
        self
    }

    /// The base description document (`{}` when none was configured).
    pub fn swagger_base(&self) -> Value {
        match &self.swagger_base_properties {
            Value::Null => Value::Object(Default::default()),
            other => other.clone(),
        }
    }
}

impl std::fmt::Debug for RouterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterConfig")
            .field("validate_responses", &self.validate_responses)
            .field("log_requests", &self.log_requests)
            .field("swagger_base_properties", &self.swagger_base_properties)
            .field("correlation_id", &self.correlation_id.is_some())
            .finish()
    }
}
