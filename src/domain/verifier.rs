//! Identity verifier trait and its failure classification.

use async_trait::async_trait;

use crate::domain::identity::Identity;

/// Boxed error used for faults whose concrete type belongs to the transport.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Reasons a token could not be turned into an [`Identity`].
///
/// `Rejected` and `Unavailable` are the provider's own answers and mean
/// "cannot authenticate". `Fault` means the call itself broke before the
/// provider could answer.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// Provider refused the token (invalid, expired, revoked, malformed).
    #[error("identity provider rejected the token ({status}): {reason}")]
    Rejected { status: u16, reason: String },

    /// Provider answered but could not produce a user.
    #[error("identity provider could not authenticate the token (status {status})")]
    Unavailable { status: u16 },

    /// The verification call failed before a usable answer arrived.
    #[error("identity provider call failed during {stage}")]
    Fault {
        stage: &'static str,
        #[source]
        source: BoxError,
    },
}

impl VerifyError {
    pub fn fault(stage: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Fault {
            stage,
            source: source.into(),
        }
    }

    /// Whether this is an infrastructure fault rather than a provider verdict.
    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Fault { .. })
    }
}

/// Exchanges opaque bearer tokens for verified identities.
///
/// Implementations hold no per-request state and are shared across all
/// in-flight requests behind an `Arc`.
///
/// # Implementations
///
/// - [`crate::infrastructure::supabase::SupabaseVerifier`] - hosted provider over HTTP
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verifies `token` with the provider.
    ///
    /// The token is forwarded as-is, including the empty string; the
    /// provider decides whether it is valid.
    ///
    /// # Errors
    ///
    /// See [`VerifyError`] for the classification of failures.
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError>;

    /// Checks whether the provider is reachable.
    ///
    /// Used by the health endpoint and at startup.
    async fn health_check(&self) -> bool;
}
