//! API route configuration.
//!
//! All API endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`], applied in [`crate::routes::app_router`].

use crate::api::handlers::{me_handler, update_me_handler};
use crate::state::AppState;
use axum::{Router, routing::get};

/// All API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `GET   /me` - Identity verified for the current request
/// - `PATCH /me` - Update the caller's profile metadata
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/me", get(me_handler).patch(update_me_handler))
}
