//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`   - Health check: identity provider reachability (public)
//! - `/api/*`         - REST API (Bearer token required)
//! - anything else    - `404` envelope
//!
//! # Middleware (outermost first)
//!
//! - **Tracing** - Structured request/response logging
//! - **Error normalization** - Development stack traces, report stripping
//! - **Panic recovery** - Handler panics become `500` envelopes
//! - **Authentication** - Bearer token gate on `/api/*` only

use crate::api;
use crate::api::handlers::{health_handler, method_not_allowed_handler, not_found_handler};
use crate::api::middleware::{auth, errors, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router);

    with_error_handling(router, state)
}

/// Installs fallbacks, state, and the error/observability stack on `router`.
///
/// Every response leaving the returned router is either a handler's own
/// success body or an error envelope.
pub fn with_error_handling(router: Router<AppState>, state: AppState) -> Router {
    let environment = state.environment;

    router
        .fallback(not_found_handler)
        .method_not_allowed_fallback(method_not_allowed_handler)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(tracing::layer())
                .layer(middleware::from_fn_with_state(environment, errors::layer))
                .layer(CatchPanicLayer::custom(errors::handle_panic)),
        )
}
