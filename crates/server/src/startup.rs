use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use common::env::check_data_file;
use service::{storage::JsonDocumentStore, Directory};

use crate::routes::{self, AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the document store at `cfg.storage.data_file` and build the router over it.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let data_file = &cfg.storage.data_file;
    check_data_file(data_file).await;

    let store = JsonDocumentStore::new(data_file.clone()).await?;
    info!(data_file = %store.path().display(), "document store ready");

    let state = AppState { directory: Arc::new(Directory::new(store)) };
    Ok(routes::build_router(state, build_cors()))
}

/// Public entry: build the app from `cfg` and run the HTTP server
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    let listener = tokio::net::TcpListener::bind(cfg.bind_addr()).await?;
    let addr: SocketAddr = listener.local_addr()?;
    info!(%addr, "starting server");
    axum::serve(listener, app).await?;
    Ok(())
}
