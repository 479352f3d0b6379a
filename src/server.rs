//! HTTP server initialization and runtime setup.
//!
//! Builds the identity provider clients, the router, and runs Axum until
//! Ctrl+C / SIGTERM.

use crate::config::Config;
use crate::infrastructure::supabase::{self, SupabaseAdmin, SupabaseVerifier};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Builds the shared state from configuration.
///
/// The provider clients are constructed exactly once here and shared by
/// every request through [`AppState`].
///
/// # Errors
///
/// Returns an error if the HTTP client or provider endpoints cannot be built.
pub fn build_state(config: &Config) -> Result<AppState> {
    let http = supabase::http_client(Duration::from_secs(config.provider_timeout_secs))?;

    let verifier = SupabaseVerifier::new(http.clone(), &config.supabase_url, &config.anon_key)?;
    let admin = SupabaseAdmin::new(http, &config.supabase_url, config.admin_key())?;

    Ok(AppState::new(
        Arc::new(verifier),
        Arc::new(admin),
        config.environment,
    ))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Identity provider clients (verifier + admin)
/// - Startup reachability probe (logged, not fatal)
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Provider clients cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config)?;

    if state.verifier.health_check().await {
        tracing::info!("Identity provider reachable");
    } else {
        tracing::warn!(
            "Identity provider at {} is not reachable; requests will fail until it is",
            config.supabase_url
        );
    }

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
