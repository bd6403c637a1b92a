use std::net::SocketAddr;

use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::{config::ServerConfig, errors::Error};

use super::{routes::build_router, AppState};

pub async fn start_api_server(config: ServerConfig, state: AppState) -> crate::Result<()> {
    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .map_err(|e| Error::config(format!("Invalid API address: {}", e)))?;

    let mut router = build_router(state);
    if config.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::from(e).with_context(format!("Failed to bind API server on {}", addr)))?;

    info!(address = %addr, "Starting HTTP API server");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "API server shutdown listener failed");
            }
        })
        .await
        .map_err(|e| Error::from(e).with_context("API server error"))?;

    info!("API server shutdown completed");
    Ok(())
}
