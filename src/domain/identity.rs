//! Verified principals and the per-request authentication context.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A principal verified by the identity provider.
///
/// Only `id` is interpreted by this service. Every other field the provider
/// returns (email, metadata, timestamps, ...) is kept in `profile` and passed
/// through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,

    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl Identity {
    /// Builds an identity from a provider user object.
    ///
    /// Returns `None` when the payload is not an object or has no non-empty
    /// string `id`.
    pub fn from_provider(user: Value) -> Option<Self> {
        let identity: Identity = serde_json::from_value(user).ok()?;

        if identity.id.is_empty() {
            return None;
        }

        Some(identity)
    }

    /// Returns the provider's `email` field, if present.
    pub fn email(&self) -> Option<&str> {
        self.profile.get("email").and_then(Value::as_str)
    }
}

/// Authentication state attached to a request once its token was verified.
///
/// Inserted into request extensions by [`crate::api::middleware::auth::layer`];
/// requests that fail verification never carry one.
#[derive(Clone)]
pub struct AuthContext {
    token: String,
    identity: Identity,
}

impl AuthContext {
    pub fn new(token: String, identity: Identity) -> Self {
        Self { token, identity }
    }

    /// Raw bearer token as presented by the client.
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn user_id(&self) -> &str {
        &self.identity.id
    }

    pub fn into_identity(self) -> Identity {
        self.identity
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("token", &"[REDACTED]")
            .field("identity", &self.identity)
            .finish()
    }
}

/// Profile fields a user may change about themselves.
///
/// Stored by the provider as user metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}

impl ProfileUpdate {
    /// Converts the update into the provider's `user_metadata` object.
    ///
    /// Absent optional fields are left out so existing values are kept.
    pub fn into_metadata(self) -> Map<String, Value> {
        let mut metadata = Map::new();
        metadata.insert("display_name".into(), Value::String(self.display_name));

        if let Some(avatar_url) = self.avatar_url {
            metadata.insert("avatar_url".into(), Value::String(avatar_url));
        }
        if let Some(bio) = self.bio {
            metadata.insert("bio".into(), Value::String(bio));
        }

        metadata
    }
}
