// Server module - HTTP execution endpoint and routing
pub mod handlers;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tracing::info;

use crate::errors::ServiceError;
use self::state::AppState;

/// Create the Axum application router with all routes
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", post(handlers::reconcile_handler))
        .route("/reconcile", post(handlers::reconcile_handler))
        .route("/health", get(handlers::health_check))
        .with_state(state)
}

/// Run the server on the specified address until ctrl-c
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), ServiceError> {
    info!("Server listening on {}", addr);
    info!("- Execution endpoint: http://{}/", addr);
    info!("- Health endpoint: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
