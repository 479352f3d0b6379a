//! Error normalization: development stack traces and panic recovery.
//!
//! Error bodies are rendered by [`AppError`]'s `IntoResponse`. This module
//! adds what that impl cannot know about: the runtime environment and
//! handler panics.

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::CONTENT_LENGTH,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::any::Any;

use crate::config::Environment;
use crate::error::{AppError, ErrorReport};

/// Finalizes error responses produced further down the stack.
///
/// Strips the internal [`ErrorReport`] extension from every response and,
/// in [`Environment::Development`], rewrites the body to include `stack`.
/// Production bodies are left untouched.
///
/// # Example
///
/// ```rust,ignore
/// let app = router.layer(middleware::from_fn_with_state(Environment::Development, errors::layer));
/// ```
pub async fn layer(State(environment): State<Environment>, req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;

    let Some(report) = response.extensions_mut().remove::<ErrorReport>() else {
        return response;
    };

    if !environment.is_development() {
        return response;
    }

    match serde_json::to_vec(&report.envelope.with_stack(report.stack)) {
        Ok(bytes) => {
            response.headers_mut().remove(CONTENT_LENGTH);
            *response.body_mut() = Body::from(bytes);
        }
        Err(e) => tracing::warn!("Failed to attach stack to error response: {}", e),
    }

    response
}

/// Converts a handler panic into a `500` envelope.
///
/// Used with `tower_http::catch_panic::CatchPanicLayer::custom`.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::internal(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}
