//! Basic-auth gate as a tower layer.
//!
//! Allow hands the request (now carrying `AuthCtx`) to the inner service.
//! Deny answers 401 without touching the inner service.
//!
//! Authorizer faults come out as the service error (`BoxError`). Routers need
//! an infallible service, so wrap this layer in `HandleErrorLayer` and decide
//! there what a broken policy means for the process:
//!
//! ```ignore
//! let protected = Router::new()
//!     .route("/whoami", get(whoami))
//!     .route_layer(
//!         ServiceBuilder::new()
//!             .layer(HandleErrorLayer::new(on_gate_fault))
//!             .layer(BasicAuthLayer::new(gate)),
//!     );
//! ```

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use axum::{
    http::Request,
    response::{IntoResponse, Response},
};
use tower::{BoxError, Layer, Service};

use crate::services::auth::{BasicAuthGate, Decision};

#[derive(Clone, Debug)]
pub struct BasicAuthLayer {
    gate: BasicAuthGate,
}

impl BasicAuthLayer {
    pub fn new(gate: BasicAuthGate) -> Self {
        Self { gate }
    }
}

impl<S> Layer<S> for BasicAuthLayer {
    type Service = BasicAuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BasicAuthService {
            inner,
            gate: self.gate.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct BasicAuthService<S> {
    inner: S,
    gate: BasicAuthGate,
}

impl<S, B> Service<Request<B>> for BasicAuthService<S>
where
    S: Service<Request<B>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Into<BoxError>,
    B: Send + 'static,
{
    type Response = Response;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<Response, BoxError>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        // use the instance that was polled ready, leave a fresh clone behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let gate = self.gate.clone();

        Box::pin(async move {
            let (mut parts, body) = req.into_parts();

            match gate.decide(&mut parts).await? {
                Decision::Allow => inner
                    .call(Request::from_parts(parts, body))
                    .await
                    .map_err(Into::into),
                Decision::Deny(rejection) => Ok(rejection.into_response()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::{Authorizer, AuthorizerError};
    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use std::convert::Infallible;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };
    use tower::{ServiceExt, service_fn};

    fn counting_inner(
        calls: Arc<AtomicUsize>,
    ) -> impl Service<Request<Body>, Response = Response, Error = Infallible, Future: Send> + Clone
    {
        service_fn(move |_req: Request<Body>| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Infallible>(Response::new(Body::from("inner")))
            }
        })
    }

    fn request(authorization: Option<String>) -> Request<Body> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).expect("request")
    }

    fn basic(user: &str, pass: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{user}:{pass}")))
    }

    fn gate() -> BasicAuthGate {
        BasicAuthGate::builder()
            .user("alice", "wonderland")
            .challenge(true)
            .build()
            .expect("gate")
    }

    #[tokio::test]
    async fn allow_calls_inner_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let service = BasicAuthLayer::new(gate()).layer(counting_inner(calls.clone()));

        let response = service
            .oneshot(request(Some(basic("alice", "wonderland"))))
            .await
            .expect("no fault");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn deny_never_calls_inner() {
        let calls = Arc::new(AtomicUsize::new(0));
        let service = BasicAuthLayer::new(gate()).layer(counting_inner(calls.clone()));

        let response = service
            .oneshot(request(Some(basic("alice", "nope"))))
            .await
            .expect("no fault");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Basic");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn authorizer_fault_surfaces_as_service_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = BasicAuthGate::builder()
            .authorizer(Authorizer::callback(|_, _, done| done.fail("policy store offline")))
            .build()
            .expect("gate");
        let service = BasicAuthLayer::new(gate).layer(counting_inner(calls.clone()));

        let err = service
            .oneshot(request(Some(basic("alice", "wonderland"))))
            .await
            .err()
            .expect("fault");

        assert!(err.downcast_ref::<AuthorizerError>().is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
