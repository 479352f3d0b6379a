//! Domain layer: identities and the provider-facing traits.
//!
//! Nothing here knows about HTTP or the concrete provider; implementations
//! live in [`crate::infrastructure`].

pub mod identity;
pub mod user_admin;
pub mod verifier;

pub use identity::{AuthContext, Identity, ProfileUpdate};
pub use user_admin::{ProviderError, UserAdmin};
pub use verifier::{BoxError, IdentityVerifier, VerifyError};
