pub use axum::http::header::CONTENT_TYPE;
pub use axum::http::request::Parts;
pub use axum::http::{Method, StatusCode};
