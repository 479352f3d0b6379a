//! Application error type and the JSON error envelope.
//!
//! Every failure leaves the service as
//!
//! ```json
//! { "success": false, "error": "<message>", "details": [...], "stack": "..." }
//! ```
//!
//! where `details` is present only for validation failures and `stack` only
//! in development mode (added by [`crate::api::middleware::errors::layer`]).

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::domain::{ProviderError, VerifyError};

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldViolation>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: None,
            stack: None,
        }
    }

    pub fn with_details(mut self, details: Vec<FieldViolation>) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_stack(mut self, stack: String) -> Self {
        self.stack = Some(stack);
        self
    }
}

/// One failed field rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    /// Where the field came from (`body`).
    pub location: &'static str,
    /// Dotted path of the field, with `[n]` for list items.
    pub field: String,
    /// Rule that failed (`length`, `url`, `invalid_json`, ...).
    pub code: String,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Diagnostic attached to error responses as a response extension.
///
/// Carries the rendered envelope and the full error chain so the error
/// normalizer can add `stack` in development without re-parsing the body.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub envelope: ErrorEnvelope,
    pub stack: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No `Authorization` header, or not a `Bearer ` credential.
    #[error("Missing or invalid authorization header")]
    MissingCredential,

    /// The provider did not accept the token.
    #[error("Invalid or expired token")]
    InvalidCredential,

    /// The verification call broke. Detail is logged, never sent.
    #[error("Authentication failed")]
    AuthFault(#[source] VerifyError),

    #[error("Validation failed")]
    Validation { details: Vec<FieldViolation> },

    /// Error reported by the provider with a machine-readable code.
    #[error("{message}")]
    Provider { code: String, message: String },

    /// Error with an explicitly declared status.
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    #[error("Route {uri} not found")]
    NotFound { uri: String },

    #[error("Method {method} not allowed for {uri}")]
    MethodNotAllowed { method: String, uri: String },

    #[error("Internal server error")]
    Internal(anyhow::Error),
}

impl AppError {
    pub fn status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingCredential | AppError::InvalidCredential => StatusCode::UNAUTHORIZED,
            AppError::Validation { .. } | AppError::Provider { .. } => StatusCode::BAD_REQUEST,
            AppError::Status { status, .. } => *status,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            AppError::AuthFault(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Full error chain for logs and the development `stack` field.
    pub fn diagnostic(&self) -> String {
        match self {
            AppError::Internal(err) => format!("{err:?}"),
            AppError::Provider { code, message } => format!("{code}: {message}"),
            other => error_chain(other),
        }
    }

    /// Renders the public envelope. Never includes internal detail.
    pub fn envelope(&self) -> ErrorEnvelope {
        let envelope = ErrorEnvelope::new(self.to_string());

        match self {
            AppError::Validation { details } => envelope.with_details(details.clone()),
            _ => envelope,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let stack = self.diagnostic();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %stack, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %stack, "Request rejected");
        }

        let envelope = self.envelope();
        let mut response = (status, Json(envelope.clone())).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
            .extensions_mut()
            .insert(ErrorReport { envelope, stack });

        response
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details = Vec::new();
        collect_violations(&errors, None, &mut details);
        // Stable sort keeps rule order within a field.
        details.sort_by(|a, b| a.field.cmp(&b.field));

        AppError::Validation { details }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();

        // Only a body that failed to parse is a field-rule failure. Missing
        // content type, oversized or unreadable bodies keep their status.
        let code = match rejection {
            JsonRejection::JsonDataError(_) => "invalid_data",
            JsonRejection::JsonSyntaxError(_) => "invalid_json",
            other => return AppError::status(other.status(), message),
        };

        AppError::Validation {
            details: vec![FieldViolation {
                location: "body",
                field: "body".to_string(),
                code: code.to_string(),
                message,
                value: None,
            }],
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Api {
                code: Some(code),
                message,
                ..
            } => AppError::Provider { code, message },
            ProviderError::Api {
                status, message, ..
            } if (400..500).contains(&status) => match StatusCode::from_u16(status) {
                Ok(status) => AppError::status(status, message),
                Err(_) => AppError::status(StatusCode::BAD_REQUEST, message),
            },
            other => AppError::internal(other),
        }
    }
}

fn collect_violations(
    errors: &ValidationErrors,
    prefix: Option<&str>,
    out: &mut Vec<FieldViolation>,
) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => field.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|e| violation(&path, e)));
            }
            ValidationErrorsKind::Struct(nested) => collect_violations(nested, Some(&path), out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_violations(nested, Some(&format!("{path}[{index}]")), out);
                }
            }
        }
    }
}

fn violation(field: &str, error: &ValidationError) -> FieldViolation {
    FieldViolation {
        location: "body",
        field: field.to_string(),
        code: error.code.to_string(),
        message: error
            .message
            .as_ref()
            .map(|message| message.to_string())
            .unwrap_or_else(|| default_message(&error.code, &error.params)),
        value: error.params.get("value").cloned(),
    }
}

fn default_message(code: &str, params: &HashMap<Cow<'static, str>, Value>) -> String {
    match (code, params.get("min"), params.get("max")) {
        ("length", Some(min), Some(max)) => format!("Length must be between {min} and {max}"),
        ("length", Some(min), None) => format!("Length must be at least {min}"),
        ("length", None, Some(max)) => format!("Length must be at most {max}"),
        ("url", _, _) => "Must be a valid URL".to_string(),
        ("email", _, _) => "Must be a valid email address".to_string(),
        _ => "Invalid value".to_string(),
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }

    rendered
}
