use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use image_request::{ImageRequestInterpreter, InterpreterConfig, ObjectStore, StorageProxyClient};
use tracing_subscriber::EnvFilter;

mod handler;

const DEFAULT_PORT: u16 = 8080;

#[derive(Clone)]
pub struct AppState {
    pub interpreter: Arc<ImageRequestInterpreter<Arc<dyn ObjectStore>>>,
}

/// 環境変数から待ち受けポートを読む（PORT、既定 8080）
fn port_from_env() -> Result<u16, String> {
    match std::env::var("PORT") {
        Ok(value) => value
            .parse()
            .map_err(|_| format!("PORT is not a valid port: {value}")),
        Err(_) => Ok(DEFAULT_PORT),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = InterpreterConfig::from_env();
    if config.source_buckets.is_none() {
        tracing::warn!("SOURCE_BUCKETS is not set; requests will fail with ConfigurationError");
    }
    let store: Arc<dyn ObjectStore> = Arc::new(StorageProxyClient::from_env()?);
    let state = AppState {
        interpreter: Arc::new(ImageRequestInterpreter::new(config, store)),
    };

    let app = Router::new()
        .route("/health", get(handler::health))
        .route("/", get(handler::interpret))
        .route("/{*path}", get(handler::interpret))
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port_from_env()?));
    tracing::info!(%addr, "image gateway listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
