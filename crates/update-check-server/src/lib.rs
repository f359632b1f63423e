//! # Update Check Server
//!
//! HTTP endpoint telling client builds whether they are up to date.

use std::net::SocketAddr;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod api;
pub mod state;

pub use state::{AppState, Checker, Outcome};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Update check
        .route("/", get(api::check::check))

        // Health check
        .route("/health", get(api::health::health_check))

        // Add middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `state` on `addr` until the process is stopped.
pub async fn run_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!("🌐 Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
