//! Request extractors that report failures through [`AppError`].

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::domain::AuthContext;
use crate::error::AppError;

/// JSON body that must pass its `validator` rules before the handler runs.
///
/// Malformed JSON and failed field rules both short-circuit with
/// `400 Validation failed` and itemized `details`.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>) { /* ... */ }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// The verified caller of a route behind [`crate::api::middleware::auth::layer`].
///
/// Extraction fails with `500` if the route was mounted without the gate.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthContext);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                AppError::internal(anyhow::anyhow!(
                    "no AuthContext on request to {}; route is not behind the auth layer",
                    parts.uri.path()
                ))
            })
    }
}
