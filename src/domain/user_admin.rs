//! Privileged user administration against the identity provider.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::identity::Identity;
use crate::domain::verifier::BoxError;

/// Errors from privileged provider calls.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Provider answered with a non-success status.
    ///
    /// `code` is the provider's machine-readable error code when it sent one.
    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// Request could not be built for the given input.
    #[error("invalid identity provider endpoint: {0}")]
    Endpoint(String),

    /// Transport error (connect, timeout, TLS).
    #[error("identity provider request failed")]
    Transport(#[source] BoxError),

    /// Response body could not be decoded into a user.
    #[error("identity provider returned an unreadable response")]
    Decode(#[source] BoxError),
}

/// User administration performed with the privileged service key.
///
/// Never used on the verification path.
///
/// # Implementations
///
/// - [`crate::infrastructure::supabase::SupabaseAdmin`] - hosted provider admin API
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAdmin: Send + Sync {
    /// Fetches a user by provider id.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Api`] when the provider reports an error
    /// (including unknown users).
    async fn get_user(&self, user_id: &str) -> Result<Identity, ProviderError>;

    /// Merges `metadata` into the user's metadata and returns the updated user.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Api`] when the provider refuses the update.
    async fn update_user_metadata(
        &self,
        user_id: &str,
        metadata: Map<String, Value>,
    ) -> Result<Identity, ProviderError>;
}
