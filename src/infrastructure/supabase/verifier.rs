//! Token verification against the provider's `/auth/v1/user` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::{APIKEY_HEADER, ProviderErrorBody, endpoint};
use crate::domain::{Identity, IdentityVerifier, ProviderError, VerifyError};

/// Verifies bearer tokens with the hosted provider using the publishable key.
///
/// Each call is a single round trip: no retries, no caching.
#[derive(Clone)]
pub struct SupabaseVerifier {
    http: Client,
    user_url: Url,
    health_url: Url,
    anon_key: String,
}

impl SupabaseVerifier {
    /// Creates a verifier for the project at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Endpoint`] if the endpoint URLs cannot be built.
    pub fn new(
        http: Client,
        base_url: &Url,
        anon_key: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            http,
            user_url: endpoint(base_url, "auth/v1/user")?,
            health_url: endpoint(base_url, "auth/v1/health")?,
            anon_key: anon_key.into(),
        })
    }
}

#[async_trait]
impl IdentityVerifier for SupabaseVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError> {
        let response = self
            .http
            .get(self.user_url.clone())
            .header(APIKEY_HEADER, &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| VerifyError::fault("transport", e))?;

        let status = response.status();

        if status.is_client_error() {
            let reason = ProviderErrorBody::read(response).await.message(status);
            debug!(status = status.as_u16(), %reason, "Provider rejected token");
            return Err(VerifyError::Rejected {
                status: status.as_u16(),
                reason,
            });
        }

        if !status.is_success() {
            warn!(status = status.as_u16(), "Provider could not verify token");
            return Err(VerifyError::Unavailable {
                status: status.as_u16(),
            });
        }

        let user: Value = response
            .json()
            .await
            .map_err(|e| VerifyError::fault("decode", e))?;

        Identity::from_provider(user).ok_or_else(|| {
            warn!("Provider answered without a user id");
            VerifyError::Unavailable {
                status: status.as_u16(),
            }
        })
    }

    async fn health_check(&self) -> bool {
        match self
            .http
            .get(self.health_url.clone())
            .header(APIKEY_HEADER, &self.anon_key)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("Identity provider health check failed: {}", e);
                false
            }
        }
    }
}
