pub mod header;

pub use axum::{serve, Json, Router};
pub use self::header::{Method, Parts, StatusCode, CONTENT_TYPE};

pub mod body {
    pub use axum::body::{to_bytes, Body};
}

pub mod extract {
    pub use axum::extract::{FromRequestParts, Path, Query, RawPathParams, Request, State};
}

pub mod middleware {
    pub use axum::middleware::{from_fn_with_state, Next};
}

pub mod response {
    pub use axum::response::{Html, IntoResponse, Response};
}

pub mod routing {
    pub use axum::handler::Handler;
    pub use axum::routing::{get, on, MethodFilter, MethodRouter};
}
