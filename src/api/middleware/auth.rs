//! Bearer token authentication gate.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use crate::domain::{AuthContext, VerifyError};
use crate::{error::AppError, state::AppState};

/// Scheme prefix required on the `Authorization` header. Case-sensitive.
const BEARER_PREFIX: &str = "Bearer ";

/// Authenticates requests using Bearer tokens from the Authorization header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Authentication Flow
///
/// 1. Extract token from `Authorization` header
/// 2. Verify the token with the identity provider
/// 3. Attach [`AuthContext`] to request extensions
/// 4. Continue to next middleware/handler
///
/// The token after the prefix is forwarded verbatim, even when empty.
///
/// # Errors
///
/// Returns `401 Unauthorized` if:
/// - Authorization header is missing or does not start with `Bearer `
/// - The provider rejects the token or cannot authenticate it
///
/// Returns `500 Internal Server Error` with `Authentication failed` if the
/// verification call itself fails. The cause is logged only.
///
/// Adds `WWW-Authenticate: Bearer` header to 401 responses per RFC 6750.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get, middleware};
/// use crate::api::middleware::auth;
///
/// let protected = Router::new()
///     .route("/api/me", get(me_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())
        .ok_or(AppError::MissingCredential)?
        .to_owned();

    let identity = match st.verifier.verify(&token).await {
        Ok(identity) => identity,
        Err(e @ (VerifyError::Rejected { .. } | VerifyError::Unavailable { .. })) => {
            tracing::debug!(error = %e, "Token verification failed");
            return Err(AppError::InvalidCredential);
        }
        Err(e) => return Err(AppError::AuthFault(e)),
    };

    tracing::debug!(user_id = %identity.id, "Request authenticated");

    req.extensions_mut()
        .insert(AuthContext::new(token, identity));

    Ok(next.run(req).await)
}

/// Returns the token following `Bearer ` or `None` if the header is absent,
/// not valid visible ASCII, or uses another scheme.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
}
