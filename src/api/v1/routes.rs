/*
 * Responsibility
 * - URL layout of v1
 * - Every route here sits behind the Basic auth gate (route_layer)
 */
use axum::{Router, error_handling::HandleErrorLayer, routing::get};
use basic_auth_gate::BasicAuthLayer;
use tower::{BoxError, ServiceBuilder};

use crate::api::v1::handlers::whoami::whoami;
use crate::error::AppError;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new().route("/whoami", get(whoami)).route_layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(on_gate_fault))
            .layer(BasicAuthLayer::new(state.gate.clone())),
    )
}

// A broken authorization policy is a server fault, not a 401.
async fn on_gate_fault(err: BoxError) -> AppError {
    tracing::error!(error = %err, "authorization policy failed");
    AppError::Internal
}
