//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations backed by the hosted identity provider.
//!
//! # Modules
//!
//! - [`supabase`] - Token verification and user administration over the provider's HTTP API

pub mod supabase;
