//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with dependency checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Identity provider reachable
/// - **503 Service Unavailable**: Identity provider unreachable. The body
///   has `success: false` and `error: "Service degraded"` next to the checks.
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "identity_provider": { "status": "ok", "message": "Reachable" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let provider_check = check_identity_provider(&state).await;
    let healthy = provider_check.status == "ok";

    let response = HealthResponse {
        success: healthy,
        error: (!healthy).then(|| "Service degraded".to_string()),
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            identity_provider: provider_check,
        },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Checks identity provider reachability via its health endpoint.
async fn check_identity_provider(state: &AppState) -> CheckStatus {
    if state.verifier.health_check().await {
        CheckStatus {
            status: "ok".to_string(),
            message: Some("Reachable".to_string()),
        }
    } else {
        CheckStatus {
            status: "error".to_string(),
            message: Some("Identity provider unreachable".to_string()),
        }
    }
}
