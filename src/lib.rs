//! # Identity Gate
//!
//! Bearer-token authentication and error normalization for Axum APIs whose
//! users live in a hosted identity provider (Supabase Auth).
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Identities, request auth context, provider traits
//! - **Application Layer** ([`application`]) - Profile service
//! - **Infrastructure Layer** ([`infrastructure`]) - Provider HTTP clients
//! - **API Layer** ([`api`]) - Auth gate, error normalizer, extractors, handlers
//!
//! ## Request Pipeline
//!
//! ```text
//! request → tracing → error normalizer → panic recovery → router
//!         → (/api/*) auth gate → handler
//! ```
//!
//! The auth gate answers `401` itself for missing or rejected tokens and
//! returns `500 Authentication failed` when the provider call breaks. Every
//! error, including unmatched routes and validation failures, leaves as
//! `{ "success": false, "error": "..." }`.
//!
//! ## Quick Start
//!
//! ```bash
//! export SUPABASE_URL="https://project.supabase.co"
//! export SUPABASE_ANON_KEY="<publishable key>"
//! export SUPABASE_SERVICE_ROLE_KEY="<service role key>"  # Optional
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::api::extract::{CurrentUser, ValidatedJson};
    pub use crate::config::Environment;
    pub use crate::domain::{AuthContext, Identity, IdentityVerifier, UserAdmin, VerifyError};
    pub use crate::error::{AppError, ErrorEnvelope, FieldViolation};
    pub use crate::state::AppState;
}
