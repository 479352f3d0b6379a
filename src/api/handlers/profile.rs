//! Handlers for the authenticated user's own profile.

use axum::{Json, extract::State};

use crate::api::dto::ApiResponse;
use crate::api::dto::profile::UpdateProfileRequest;
use crate::api::extract::{CurrentUser, ValidatedJson};
use crate::domain::Identity;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the identity verified for this request.
///
/// # Endpoint
///
/// `GET /api/me`
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "data": {
///     "id": "0d1f...",
///     "email": "ada@example.com",
///     "user_metadata": { "display_name": "Ada" }
///   }
/// }
/// ```
///
/// All fields except `id` are passed through from the provider unchanged.
pub async fn me_handler(CurrentUser(ctx): CurrentUser) -> Json<ApiResponse<Identity>> {
    Json(ApiResponse::ok(ctx.into_identity()))
}

/// Updates the caller's profile metadata.
///
/// # Endpoint
///
/// `PATCH /api/me`
///
/// # Request Body
///
/// ```json
/// {
///   "display_name": "Ada",
///   "avatar_url": "https://cdn.example.com/ada.png",  // optional
///   "bio": "Analyst"                                   // optional
/// }
/// ```
///
/// # Errors
///
/// - `400` with `details` if the body fails validation
/// - `400` with the provider's message if the provider refuses the update
pub async fn update_me_handler(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<Identity>>, AppError> {
    let identity = state
        .profile_service
        .update_profile(ctx.user_id(), payload.into())
        .await?;

    Ok(Json(ApiResponse::ok(identity)))
}
