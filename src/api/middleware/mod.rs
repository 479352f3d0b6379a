//! HTTP middleware for request processing and protection.
//!
//! Provides the authentication gate, error normalization, and observability
//! middleware.

pub mod auth;
pub mod errors;
pub mod tracing;
