/*!
 * Basic-auth context extractor
 *
 * Responsibility:
 * - Give handlers the credentials the gate attached to the request (AuthCtx)
 * - HTTP / axum specifics stay in core, the type itself in types
 *
 * Public API:
 * - AuthCtx
 * - AuthCtxExtractor
 */

mod core;
mod types;

pub use self::core::AuthCtxExtractor;
pub use types::AuthCtx;
