//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod fallback;
pub mod health;
pub mod profile;

pub use fallback::{method_not_allowed_handler, not_found_handler};
pub use health::health_handler;
pub use profile::{me_handler, update_me_handler};
