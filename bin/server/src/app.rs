//! Router assembly and the serve loop.

use axum::{
    Router,
    routing::{get, post},
};
use rootcause::Report;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::auth::{self, AppState};
use crate::config::ServerConfig;
use crate::error::StartupError;

/// Builds the HTTP router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/auth/discord", post(auth::exchange))
        .route("/auth/login", get(auth::login))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the configured address and serves until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the state cannot be built, the address cannot be
/// bound, or the server loop fails.
pub async fn serve(config: ServerConfig) -> Result<(), Report<StartupError>> {
    let state = Arc::new(AppState::from_config(&config)?);
    tracing::info!(
        whitelisted = state.handshake.whitelist().len(),
        backend = %config.backend.base_url,
        "auth state ready"
    );

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| StartupError::Bind {
            addr: config.listen_addr.clone(),
            details: e.to_string(),
        })?;

    tracing::info!("listening on http://{}", config.listen_addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StartupError::Serve {
            details: e.to_string(),
        })?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
