use petstore::{app, PetStore};
use schemagate::RouterConfig;

const DEFAULT_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/application.yaml");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    schemagate::init_tracing();

    let config_path = std::env::var("PETSTORE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG.to_string());
    let config = RouterConfig::load(&config_path)?;
    let api_key = std::env::var("PETSTORE_API_KEY").unwrap_or_else(|_| "let-me-in".to_string());
    let addr = std::env::var("PETSTORE_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let router = app(config, &api_key, PetStore::new())?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, config = %config_path, "petstore listening, docs at /docs");
    schemagate::http::serve(listener, router).await?;
    Ok(())
}
