//! Hosted identity provider client (Supabase Auth / GoTrue HTTP API).
//!
//! One [`reqwest::Client`] is built at startup and shared by the
//! [`SupabaseVerifier`] (publishable key) and the [`SupabaseAdmin`]
//! (service-role key). Both are cheap to clone and safe to call
//! concurrently.
//!
//! ## Endpoints
//!
//! | Method | Path | Used by |
//! |--------|------|---------|
//! | GET    | `/auth/v1/user` | token verification |
//! | GET    | `/auth/v1/health` | health check |
//! | GET    | `/auth/v1/admin/users/{id}` | admin lookup |
//! | PUT    | `/auth/v1/admin/users/{id}` | admin metadata update |

mod admin;
mod verifier;

pub use admin::SupabaseAdmin;
pub use verifier::SupabaseVerifier;

use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::domain::ProviderError;

/// Header carrying the project key on every provider request.
pub(crate) const APIKEY_HEADER: &str = "apikey";

/// Builds the HTTP client shared by all provider calls.
///
/// The timeout is the only deadline applied to verification.
///
/// # Errors
///
/// Returns [`ProviderError::Transport`] if the TLS backend cannot be initialized.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ProviderError::Transport(Box::new(e)))
}

/// Resolves `path` against the project base URL.
///
/// The base is treated as a directory, so `https://host/prefix` and
/// `https://host/prefix/` resolve identically.
pub(crate) fn endpoint(base: &Url, path: &str) -> Result<Url, ProviderError> {
    let mut base = base.clone();

    if !base.path().ends_with('/') {
        let dir = format!("{}/", base.path());
        base.set_path(&dir);
    }

    base.join(path)
        .map_err(|e| ProviderError::Endpoint(format!("{path}: {e}")))
}

/// Error body returned by the provider.
///
/// Newer releases send `{ "code": 401, "error_code": "...", "msg": "..." }`,
/// older ones `{ "error": "...", "error_description": "..." }`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProviderErrorBody {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl ProviderErrorBody {
    /// Reads the body of a failed response. Unparseable bodies yield an empty value.
    pub(crate) async fn read(response: reqwest::Response) -> Self {
        match response.bytes().await {
            Ok(bytes) => Self::parse(&bytes),
            Err(e) => {
                tracing::debug!("Failed to read provider error body: {}", e);
                Self::default()
            }
        }
    }

    pub(crate) fn parse(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }

    pub(crate) fn code(&self) -> Option<String> {
        self.error_code.clone().or_else(|| self.error.clone())
    }

    pub(crate) fn message(&self, status: StatusCode) -> String {
        self.msg
            .clone()
            .or_else(|| self.message.clone())
            .or_else(|| self.error_description.clone())
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Identity provider error")
                    .to_string()
            })
    }

    pub(crate) fn into_error(self, status: StatusCode) -> ProviderError {
        ProviderError::Api {
            status: status.as_u16(),
            code: self.code(),
            message: self.message(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_treats_base_as_directory() {
        let with_slash = Url::parse("https://project.supabase.co/").unwrap();
        let prefixed = Url::parse("http://localhost:54321/gateway").unwrap();

        assert_eq!(
            endpoint(&with_slash, "auth/v1/user").unwrap().as_str(),
            "https://project.supabase.co/auth/v1/user"
        );
        assert_eq!(
            endpoint(&prefixed, "auth/v1/user").unwrap().as_str(),
            "http://localhost:54321/gateway/auth/v1/user"
        );
    }

    #[test]
    fn test_error_body_current_format() {
        let body = ProviderErrorBody::parse(
            br#"{"code":403,"error_code":"bad_jwt","msg":"invalid JWT: token is expired"}"#,
        );

        assert_eq!(body.code().as_deref(), Some("bad_jwt"));
        assert_eq!(
            body.message(StatusCode::FORBIDDEN),
            "invalid JWT: token is expired"
        );
    }

    #[test]
    fn test_error_body_legacy_format() {
        let body = ProviderErrorBody::parse(
            br#"{"error":"invalid_grant","error_description":"Invalid Refresh Token"}"#,
        );

        assert_eq!(body.code().as_deref(), Some("invalid_grant"));
        assert_eq!(
            body.message(StatusCode::BAD_REQUEST),
            "Invalid Refresh Token"
        );
    }

    #[test]
    fn test_error_body_unparseable_falls_back_to_reason() {
        let body = ProviderErrorBody::parse(b"<html>bad gateway</html>");

        assert!(body.code().is_none());
        assert_eq!(body.message(StatusCode::NOT_FOUND), "Not Found");
    }

    #[test]
    fn test_into_error_carries_status() {
        let err = ProviderErrorBody::parse(br#"{"msg":"User not found"}"#)
            .into_error(StatusCode::NOT_FOUND);

        match err {
            ProviderError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 404);
                assert!(code.is_none());
                assert_eq!(message, "User not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
