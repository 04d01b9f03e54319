//! HTTP serving of the built dashboard.
//!
//! Every path is looked up in the assets directory; unknown paths get
//! `index.html` so the page loads from any URL. Responses are gzip-compressed
//! when the client accepts it, CORS is open, and a panicking request becomes
//! a 500 instead of taking the server down.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:14000";
pub const INDEX_FILE: &str = "index.html";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    /// Output directory of the web build
    pub assets_dir: PathBuf,
}

/// Router serving `assets_dir` with the SPA fallback and standard layers.
pub fn router(assets_dir: &Path) -> Router {
    let index = ServeFile::new(assets_dir.join(INDEX_FILE));
    let assets = ServeDir::new(assets_dir).fallback(index);

    Router::new()
        .fallback_service(assets)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
}

/// Bind and serve until Ctrl+C.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    if !config.assets_dir.join(INDEX_FILE).is_file() {
        tracing::warn!(
            assets_dir = %config.assets_dir.display(),
            "No {INDEX_FILE} in assets directory; the dashboard will not load"
        );
    }

    let app = router(&config.assets_dir);
    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("failed to listen on {}", config.listen))?;

    tracing::info!(
        address = %config.listen,
        assets_dir = %config.assets_dir.display(),
        "UI server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("UI server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
