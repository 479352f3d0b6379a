//! Fallback handlers for unmatched routes and methods.

use axum::extract::OriginalUri;
use axum::http::{Method, Uri};

use crate::error::AppError;

/// Handles requests that match no route.
///
/// The message echoes the path and query exactly as received:
///
/// ```json
/// { "success": false, "error": "Route /api/unknown?x=1 not found" }
/// ```
pub async fn not_found_handler(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::NotFound {
        uri: request_target(&uri),
    }
}

/// Handles requests whose path matches but whose method does not.
pub async fn method_not_allowed_handler(method: Method, OriginalUri(uri): OriginalUri) -> AppError {
    AppError::MethodNotAllowed {
        method: method.to_string(),
        uri: request_target(&uri),
    }
}

fn request_target(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}
