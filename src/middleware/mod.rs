/*
 * Responsibility
 * - Public interface of the middleware (re-export)
 */
pub mod basic_auth;

pub use basic_auth::{BasicAuthLayer, BasicAuthService};
