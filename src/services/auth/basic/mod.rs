/*!
 * HTTP Basic credentials
 *
 * Responsibility:
 * - Decode the `Authorization` header into a username/password pair
 * - Header parsing lives in core, the value type in types
 */

mod core;
mod types;

pub use self::core::parse;
pub use types::Credentials;
