#![allow(dead_code)]

use axum_test::TestServer;
use identity_gate::config::Environment;
use identity_gate::infrastructure::supabase::{self, SupabaseAdmin, SupabaseVerifier};
use identity_gate::routes::app_router;
use identity_gate::state::AppState;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ANON_KEY: &str = "test-anon-key";
pub const SERVICE_KEY: &str = "test-service-key";

/// Address where nothing listens; provider calls fail at the transport.
pub const UNREACHABLE_PROVIDER: &str = "http://127.0.0.1:1";

pub fn create_test_state(provider_url: &str, environment: Environment) -> AppState {
    let base = Url::parse(provider_url).unwrap();
    let http = supabase::http_client(Duration::from_secs(5)).unwrap();

    let verifier = SupabaseVerifier::new(http.clone(), &base, ANON_KEY).unwrap();
    let admin = SupabaseAdmin::new(http, &base, SERVICE_KEY).unwrap();

    AppState::new(Arc::new(verifier), Arc::new(admin), environment)
}

pub fn create_test_server(provider_url: &str, environment: Environment) -> TestServer {
    TestServer::new(app_router(create_test_state(provider_url, environment))).unwrap()
}

pub fn provider_user(user_id: &str) -> Value {
    json!({
        "id": user_id,
        "aud": "authenticated",
        "role": "authenticated",
        "email": format!("{user_id}@example.com"),
        "user_metadata": {}
    })
}

/// Provider accepts `token` as belonging to `user_id`.
pub async fn mount_user(server: &MockServer, token: &str, user_id: &str) {
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("authorization", format!("Bearer {token}")))
        .and(header("apikey", ANON_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(provider_user(user_id)))
        .mount(server)
        .await;
}

/// Provider rejects `token` the way it rejects expired JWTs.
pub async fn mount_rejected(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("authorization", format!("Bearer {token}")))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "code": 403,
            "error_code": "bad_jwt",
            "msg": "invalid JWT: unable to parse or verify signature, token has invalid claims: token is expired"
        })))
        .mount(server)
        .await;
}
