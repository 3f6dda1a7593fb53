//! HTTP layer exposing the analysis pipeline as JSON endpoints.

pub mod routes;
pub mod types;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::pipeline::Pipeline;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

/// Build the router; separated from [`serve`] so tests can drive it directly.
pub fn router(pipeline: Arc<Pipeline>) -> Router {
    let state = AppState { pipeline };
    Router::new()
        .route("/healthz", get(routes::healthz))
        .route("/analyze", post(routes::analyze))
        .route("/entities", post(routes::entities))
        .route("/clauses", post(routes::clauses))
        .route("/summarize", post(routes::summarize))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(pipeline: Arc<Pipeline>, host: String, port: u16) -> Result<()> {
    let router = router(pipeline);
    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!(%addr, "serving legal-lens API");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
