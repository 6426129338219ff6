pub mod authorizer;
pub mod basic;
pub mod decision;
pub mod error;
pub mod gate;
pub mod users;

pub use authorizer::{AsyncAuthorize, AsyncAuthorizeRequest, Authorizer, Completion};
pub use basic::Credentials;
pub use decision::{Decision, Rejection, UnauthorizedBody};
pub use error::{AuthorizerError, ConfigError};
pub use gate::{BasicAuthGate, BasicAuthGateBuilder};
pub use users::UserTable;
