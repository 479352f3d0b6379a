//! Shared application state injected into handlers and middleware.

use std::sync::Arc;

use crate::application::services::ProfileService;
use crate::config::Environment;
use crate::domain::{IdentityVerifier, UserAdmin};

/// Handles constructed once at startup and cloned into every request.
///
/// Holds only `Arc`s and plain values; nothing here is mutated per request.
#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<dyn IdentityVerifier>,
    pub profile_service: Arc<ProfileService>,
    pub environment: Environment,
}

impl AppState {
    pub fn new(
        verifier: Arc<dyn IdentityVerifier>,
        admin: Arc<dyn UserAdmin>,
        environment: Environment,
    ) -> Self {
        Self {
            verifier,
            profile_service: Arc::new(ProfileService::new(admin)),
            environment,
        }
    }
}
