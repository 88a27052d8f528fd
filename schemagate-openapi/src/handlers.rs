use schemagate_core::http::response::{Html, IntoResponse};
use schemagate_core::http::routing::get;
use schemagate_core::http::{Router, CONTENT_TYPE};
use serde_json::Value;
use std::sync::Arc;

/// Routes serving `spec` as JSON at `{path}/swagger.json` and a Swagger UI
/// page for it at `path`.
pub fn docs_routes<S: Clone + Send + Sync + 'static>(path: &str, spec: &Value) -> Router<S> {
    let base = path.trim_end_matches('/');
    let json_path = format!("{base}/swagger.json");
    let page_path = if base.is_empty() { "/".to_string() } else { base.to_string() };

    let spec_json: Arc<str> = serde_json::to_string_pretty(spec)
        .unwrap_or_else(|_| "{}".to_string())
        .into();
    let page: Arc<str> = SWAGGER_UI_HTML.replace("{{SPEC_URL}}", &json_path).into();

    Router::<S>::new()
        .route(
            &json_path,
            get(move || {
                let json = spec_json.clone();
                async move { ([(CONTENT_TYPE, "application/json")], json.to_string()).into_response() }
            }),
        )
        .route(
            &page_path,
            get(move || {
                let page = page.clone();
                async move { Html(page.to_string()).into_response() }
            }),
        )
}

const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>API Documentation</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({ url: "{{SPEC_URL}}", dom_id: "#swagger-ui" });
        };
    </script>
</body>
</html>"##;
