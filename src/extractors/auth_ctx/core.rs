use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use super::AuthCtx;

/// Extractor handing the gate's `AuthCtx` to a handler.
/// Assumes the gate layer already inserted it into request extensions.
/// Missing means the route is not behind the gate, so 401.
pub struct AuthCtxExtractor(pub AuthCtx);

impl<S> FromRequestParts<S> for AuthCtxExtractor
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthCtx>()
            .cloned()
            .map(AuthCtxExtractor)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn extracts_context_inserted_by_gate() {
        let (mut parts, _) = Request::builder().body(()).expect("request").into_parts();
        parts.extensions.insert(AuthCtx::new("alice", "pw"));

        let AuthCtxExtractor(ctx) = AuthCtxExtractor::from_request_parts(&mut parts, &())
            .await
            .expect("context present");
        assert_eq!(ctx.user.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn missing_context_is_unauthorized() {
        let (mut parts, _) = Request::builder().body(()).expect("request").into_parts();
        let rejection = AuthCtxExtractor::from_request_parts(&mut parts, &())
            .await
            .err()
            .expect("no context");
        assert_eq!(rejection, StatusCode::UNAUTHORIZED);
    }
}
