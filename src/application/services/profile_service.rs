//! Self-service profile updates for authenticated users.

use std::sync::Arc;

use crate::domain::{Identity, ProfileUpdate, UserAdmin};
use crate::error::AppError;

/// Service for changing the authenticated user's own profile.
///
/// Writes go through the privileged admin client; the user id always comes
/// from the verified [`crate::domain::AuthContext`], never from the request body.
pub struct ProfileService {
    admin: Arc<dyn UserAdmin>,
}

impl ProfileService {
    pub fn new(admin: Arc<dyn UserAdmin>) -> Self {
        Self { admin }
    }

    /// Stores `update` as the user's metadata and returns the refreshed identity.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Provider`] if the provider refuses the update with an
    /// error code, [`AppError::Internal`] if the provider cannot be reached.
    pub async fn update_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate,
    ) -> Result<Identity, AppError> {
        let identity = self
            .admin
            .update_user_metadata(user_id, update.into_metadata())
            .await?;

        tracing::info!(user_id, "Profile metadata updated");

        Ok(identity)
    }
}
