/*
 * Responsibility
 * - GET /api/v1/whoami (behind the gate)
 * - Echo the user the gate accepted, never the password
 */
use axum::{Json, response::IntoResponse};
use serde_json::json;

use basic_auth_gate::AuthCtxExtractor;

pub async fn whoami(AuthCtxExtractor(ctx): AuthCtxExtractor) -> impl IntoResponse {
    Json(json!({ "user": ctx.user }))
}
