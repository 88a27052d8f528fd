//! schemagate: schema-validated routing over Axum.
//!
//! This facade crate re-exports the sub-crates through a single dependency.
//! Import everything you need with:
//!
//! ```ignore
//! use schemagate::prelude::*;
//! ```
//!
//! # Feature flags
//!
//! | Feature   | Default | Crate                |
//! |-----------|---------|----------------------|
//! | `openapi` | **yes** | `schemagate-openapi` |

pub extern crate schemagate_core;

pub use schemagate_core::*;

#[cfg(feature = "openapi")]
pub use schemagate_openapi;

/// Unified prelude: the core prelude plus the docs extension when the
/// `openapi` feature is enabled.
pub mod prelude {
    pub use schemagate_core::prelude::*;

    #[cfg(feature = "openapi")]
    pub use schemagate_openapi::{SwaggerDocs, SwaggerExt};
}
