/*
 * Responsibility
 * - Failures the gate reports to developers (never shaped as HTTP responses)
 */
use thiserror::Error;
use tower::BoxError;

/// Raised while building the gate. Never raised per request.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid user entry at position {index}: expected `user:password`")]
    InvalidUserEntry { index: usize },
    #[error("realm cannot be used in a WWW-Authenticate header: {realm:?}")]
    InvalidRealm { realm: String },
}

/// The authorization policy itself failed. Not a denial.
#[derive(Debug, Error)]
pub enum AuthorizerError {
    #[error("authorizer failed: {0}")]
    Failed(#[source] BoxError),
    #[error("authorizer dropped its completion without responding")]
    Abandoned,
}
