//! Application state management.
//!
//! This module defines the shared application state passed to all request handlers.

use axum_helpers::JwtAuth;

/// Shared application state.
///
/// Cloned for each handler (inexpensive Arc clones), providing access to:
/// - Application configuration
/// - PostgreSQL database connection pool
/// - JWT authentication
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL database connection pool
    pub db: database::postgres::DatabaseConnection,
    /// Stateless JWT token signer/verifier
    pub jwt_auth: JwtAuth,
}
