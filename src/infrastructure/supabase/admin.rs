//! Privileged user administration via `/auth/v1/admin/users`.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::{Map, Value, json};
use url::Url;

use super::{APIKEY_HEADER, ProviderErrorBody, endpoint};
use crate::domain::{Identity, ProviderError, UserAdmin};

/// Admin client authenticated with the service-role key.
///
/// The service-role key bypasses row-level policies on the provider side;
/// this client is never handed to the authentication gate.
#[derive(Clone)]
pub struct SupabaseAdmin {
    http: Client,
    users_url: Url,
    service_key: String,
}

impl SupabaseAdmin {
    /// Creates an admin client for the project at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Endpoint`] if the endpoint URL cannot be built.
    pub fn new(
        http: Client,
        base_url: &Url,
        service_key: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            http,
            users_url: endpoint(base_url, "auth/v1/admin/users")?,
            service_key: service_key.into(),
        })
    }

    /// Builds `/auth/v1/admin/users/{id}` with `id` as one encoded segment.
    fn user_url(&self, user_id: &str) -> Result<Url, ProviderError> {
        if user_id.is_empty() {
            return Err(ProviderError::Endpoint("user id must not be empty".into()));
        }

        let mut url = self.users_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::Endpoint(format!("cannot extend {}", self.users_url)))?
            .pop_if_empty()
            .push(user_id);

        Ok(url)
    }
}

#[async_trait]
impl UserAdmin for SupabaseAdmin {
    async fn get_user(&self, user_id: &str) -> Result<Identity, ProviderError> {
        let response = self
            .http
            .get(self.user_url(user_id)?)
            .header(APIKEY_HEADER, &self.service_key)
            .bearer_auth(&self.service_key)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(Box::new(e)))?;

        decode_user(response).await
    }

    async fn update_user_metadata(
        &self,
        user_id: &str,
        metadata: Map<String, Value>,
    ) -> Result<Identity, ProviderError> {
        let response = self
            .http
            .put(self.user_url(user_id)?)
            .header(APIKEY_HEADER, &self.service_key)
            .bearer_auth(&self.service_key)
            .json(&json!({ "user_metadata": metadata }))
            .send()
            .await
            .map_err(|e| ProviderError::Transport(Box::new(e)))?;

        decode_user(response).await
    }
}

async fn decode_user(response: Response) -> Result<Identity, ProviderError> {
    let status = response.status();

    if !status.is_success() {
        return Err(ProviderErrorBody::read(response).await.into_error(status));
    }

    let user: Value = response
        .json()
        .await
        .map_err(|e| ProviderError::Decode(Box::new(e)))?;

    Identity::from_provider(user).ok_or_else(|| ProviderError::Decode("user object without id".into()))
}
