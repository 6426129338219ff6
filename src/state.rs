/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 * - Cloned per request, so everything inside is Arc-backed and read-only
 */
use basic_auth_gate::BasicAuthGate;

#[derive(Clone, Debug)]
pub struct AppState {
    pub gate: BasicAuthGate,
}

impl AppState {
    pub fn new(gate: BasicAuthGate) -> Self {
        Self { gate }
    }
}
