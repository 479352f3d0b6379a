mod common;

use axum::http::StatusCode;
use identity_gate::config::Environment;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ─── GET /api/me ───

#[tokio::test]
async fn test_me_returns_verified_identity() {
    let provider = MockServer::start().await;
    common::mount_user(&provider, "abc123", "u_42").await;
    let server = common::create_test_server(&provider.uri(), Environment::Production);

    let response = server
        .get("/api/me")
        .add_header("Authorization", "Bearer abc123")
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], "u_42");
    assert_eq!(body["data"]["email"], "u_42@example.com");
    assert_eq!(body["data"]["role"], "authenticated");
}

#[tokio::test]
async fn test_me_without_token_is_unauthorized() {
    let provider = MockServer::start().await;
    let server = common::create_test_server(&provider.uri(), Environment::Production);

    let response = server.get("/api/me").await;

    response.assert_status_unauthorized();
    assert_eq!(
        response.json::<Value>(),
        json!({ "success": false, "error": "Missing or invalid authorization header" })
    );
}

#[tokio::test]
async fn test_me_with_expired_token_is_unauthorized() {
    let provider = MockServer::start().await;
    common::mount_rejected(&provider, "expired999").await;
    let server = common::create_test_server(&provider.uri(), Environment::Production);

    let response = server
        .get("/api/me")
        .add_header("Authorization", "Bearer expired999")
        .await;

    response.assert_status_unauthorized();
    assert_eq!(response.json::<Value>()["error"], "Invalid or expired token");
}

// ─── PATCH /api/me ───

#[tokio::test]
async fn test_update_profile_writes_metadata() {
    let provider = MockServer::start().await;
    common::mount_user(&provider, "abc123", "u_42").await;

    Mock::given(method("PUT"))
        .and(path("/auth/v1/admin/users/u_42"))
        .and(header("apikey", common::SERVICE_KEY))
        .and(header("authorization", format!("Bearer {}", common::SERVICE_KEY)))
        .and(body_partial_json(json!({
            "user_metadata": { "display_name": "Ada", "bio": "Analyst" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u_42",
            "email": "u_42@example.com",
            "user_metadata": { "display_name": "Ada", "bio": "Analyst" }
        })))
        .expect(1)
        .mount(&provider)
        .await;

    let server = common::create_test_server(&provider.uri(), Environment::Production);

    let response = server
        .patch("/api/me")
        .add_header("Authorization", "Bearer abc123")
        .json(&json!({ "display_name": "Ada", "bio": "Analyst" }))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], "u_42");
    assert_eq!(body["data"]["user_metadata"]["display_name"], "Ada");
}

#[tokio::test]
async fn test_update_profile_invalid_body_never_reaches_provider() {
    let provider = MockServer::start().await;
    common::mount_user(&provider, "abc123", "u_42").await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&provider)
        .await;

    let server = common::create_test_server(&provider.uri(), Environment::Production);

    let response = server
        .patch("/api/me")
        .add_header("Authorization", "Bearer abc123")
        .json(&json!({ "display_name": "", "avatar_url": "not a url" }))
        .await;

    response.assert_status_bad_request();
    let body = response.json::<Value>();
    assert_eq!(body["error"], "Validation failed");

    let details = body["details"].as_array().unwrap();
    assert_eq!(details.len(), 2);
    assert_eq!(details[0]["field"], "avatar_url");
    assert_eq!(details[0]["message"], "Invalid URL format");
    assert_eq!(details[1]["field"], "display_name");
    assert_eq!(details[1]["message"], "Display name must be 1-64 characters");
}

#[tokio::test]
async fn test_update_profile_passes_provider_error_through() {
    let provider = MockServer::start().await;
    common::mount_user(&provider, "abc123", "u_42").await;

    Mock::given(method("PUT"))
        .and(path("/auth/v1/admin/users/u_42"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "code": 422,
            "error_code": "validation_failed",
            "msg": "User metadata is too large"
        })))
        .mount(&provider)
        .await;

    let server = common::create_test_server(&provider.uri(), Environment::Production);

    let response = server
        .patch("/api/me")
        .add_header("Authorization", "Bearer abc123")
        .json(&json!({ "display_name": "Ada" }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<Value>(),
        json!({ "success": false, "error": "User metadata is too large" })
    );
}

#[tokio::test]
async fn test_update_profile_provider_outage_is_internal_error() {
    let provider = MockServer::start().await;
    common::mount_user(&provider, "abc123", "u_42").await;

    Mock::given(method("PUT"))
        .and(path("/auth/v1/admin/users/u_42"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&provider)
        .await;

    let server = common::create_test_server(&provider.uri(), Environment::Production);

    let response = server
        .patch("/api/me")
        .add_header("Authorization", "Bearer abc123")
        .json(&json!({ "display_name": "Ada" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({ "success": false, "error": "Internal server error" })
    );
}

#[tokio::test]
async fn test_update_profile_without_token_is_unauthorized() {
    let provider = MockServer::start().await;
    let server = common::create_test_server(&provider.uri(), Environment::Production);

    let response = server
        .patch("/api/me")
        .json(&json!({ "display_name": "Ada" }))
        .await;

    response.assert_status_unauthorized();
    assert!(provider.received_requests().await.unwrap().is_empty());
}
