//! REST API layer for HTTP request/response handling.
//!
//! This layer translates HTTP requests into application calls and formats
//! responses into the `{ success, ... }` envelope.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`extract`] - Validating and identity-carrying extractors
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Authentication gate, error normalization, tracing
//! - [`routes`] - Route configuration and composition

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
