//! DTOs for the profile endpoints.

use serde::Deserialize;
use validator::Validate;

use crate::domain::ProfileUpdate;

/// Request body for `PATCH /api/me`.
///
/// Absent optional fields keep their current values.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 64, message = "Display name must be 1-64 characters"))]
    pub display_name: String,

    #[validate(url(message = "Invalid URL format"))]
    pub avatar_url: Option<String>,

    #[validate(length(max = 280))]
    pub bio: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            display_name: req.display_name,
            avatar_url: req.avatar_url,
            bio: req.bio,
        }
    }
}
