//! Custom extractors for Axum handlers.
//!
//! Shared extractors that standardize request validation and
//! error responses across the API surface.

pub mod uuid_path;
pub mod validated_json;

pub use uuid_path::UuidPath;
pub use validated_json::ValidatedJson;
