//! Business logic services for the application layer.

pub mod profile_service;

pub use profile_service::ProfileService;
