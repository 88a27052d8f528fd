mod app;
mod logs;

pub use app::{resolve_path, TestApp, TestRequest, TestResponse};
pub use logs::LogCapture;
