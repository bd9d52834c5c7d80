//! HTTP surface.
//!
//! A thin axum layer over [`RagService`]: decode the conversation, run the
//! chosen orchestrator, encode the result or a structured error.

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use axum::routing::{get, post};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::rag::RagService;

pub use dto::{ApiChatRequest, ApiMessage, ApiResponse, ErrorBody, ErrorResponse, MessageResponse};
pub use error::ApiError;
pub use state::AppState;

/// Builds the router with all routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/status", get(routes::status))
        .route("/rag", post(routes::rag))
        .route("/rag-agent", post(routes::rag_agent))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serves the API until Ctrl-C.
///
/// On shutdown the token handed to every in-flight run is cancelled.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn serve(service: RagService, host: &str, port: u16) -> anyhow::Result<()> {
    let shutdown = CancellationToken::new();
    let app = router(AppState::new(service, shutdown.clone()));

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "RAG API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown requested");
            shutdown.cancel();
        })
        .await?;

    Ok(())
}
