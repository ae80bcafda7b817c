//! Likes Reconciler Main Entry Point
//!
//! Serves the execution endpoint the platform calls whenever a vote document is
//! created.

use dotenv::dotenv;
use likes_reconciler::server::{create_app, run_server, state::AppState};
use likes_reconciler::{ReconcilerConfig, ServiceError};
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("likes_reconciler=info,likes_reconciler_repository=info")
    });

    let json = env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();
    }

    info!(
        service_name = "likes-reconciler",
        service_version = env!("CARGO_PKG_VERSION"),
        json,
        "Tracing initialized"
    );
}

#[tokio::main]
async fn main() -> Result<(), ServiceError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    info!("Starting likes reconciler");

    let config = match ReconcilerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return Err(ServiceError::config(e.to_string()));
        }
    };
    info!(config = ?config, "Configuration loaded");

    let source = config
        .store_source()
        .map_err(|e| ServiceError::config(e.to_string()))?;
    let addr = config
        .bind_addr()
        .map_err(|e| ServiceError::config(e.to_string()))?;

    let app = create_app(AppState::new(config, source));

    match run_server(app, addr).await {
        Ok(()) => {
            info!("Likes reconciler stopped");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Likes reconciler failed");
            Err(e)
        }
    }
}
