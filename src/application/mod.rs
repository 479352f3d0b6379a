//! Application layer services.
//!
//! Services orchestrate domain traits and hold the rules handlers should not
//! know about. They take trait objects so tests can swap in mocks.
//!
//! # Available Services
//!
//! - [`services::profile_service::ProfileService`] - Self-service profile metadata updates

pub mod services;
