/*
 * Responsibility
 * - HTTP Basic authorization gate for axum / tower pipelines
 * - Public surface: gate configuration, decision engine, layer, extractor,
 *   constant-time comparison
 */
//! Per-request HTTP Basic authorization.
//!
//! ```ignore
//! let gate = BasicAuthGate::builder()
//!     .user("admin", "secret")
//!     .challenge(true)
//!     .realm("ops")
//!     .build()?;
//!
//! let app = Router::new()
//!     .route("/whoami", get(whoami))
//!     .route_layer(
//!         ServiceBuilder::new()
//!             .layer(HandleErrorLayer::new(on_gate_fault))
//!             .layer(BasicAuthLayer::new(gate)),
//!     );
//! ```

pub mod extractors;
pub mod middleware;
pub mod services;

pub use extractors::{AuthCtx, AuthCtxExtractor};
pub use middleware::{BasicAuthLayer, BasicAuthService};
pub use services::auth::{
    AsyncAuthorize, AsyncAuthorizeRequest, Authorizer, AuthorizerError, BasicAuthGate,
    BasicAuthGateBuilder, Completion, ConfigError, Credentials, Decision, Rejection,
    UnauthorizedBody, UserTable,
};
pub use services::compare::{ct_compare, safe_compare};
