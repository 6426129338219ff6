//! Authorization policies.
//!
//! The policy is picked once, when the gate is built, from a closed set:
//! the static user table, a sync function, or an async one, each optionally
//! seeing the request. Nothing is dispatched by inspecting the callee at
//! request time.

use std::{future::Future, sync::Arc};

use async_trait::async_trait;
use axum::http::request::Parts;
use tokio::sync::oneshot;
use tower::BoxError;

use super::error::AuthorizerError;
use super::users::UserTable;

/// Async policy over username and password.
///
/// `Err` means the policy is broken (backend down, bug, ...). It is surfaced
/// as [`AuthorizerError`], never turned into a 401.
#[async_trait]
pub trait AsyncAuthorize: Send + Sync {
    async fn authorize(&self, username: &str, password: &str) -> Result<bool, BoxError>;
}

/// Async policy that also sees the request (headers, uri, extensions).
#[async_trait]
pub trait AsyncAuthorizeRequest: Send + Sync {
    async fn authorize(
        &self,
        username: &str,
        password: &str,
        parts: &Parts,
    ) -> Result<bool, BoxError>;
}

type SyncFn = dyn Fn(&str, &str) -> bool + Send + Sync;
type SyncRequestFn = dyn Fn(&str, &str, &Parts) -> bool + Send + Sync;

#[derive(Clone)]
pub enum Authorizer {
    /// Built-in policy: constant-time match against every table entry.
    Users(UserTable),
    Sync(Arc<SyncFn>),
    SyncRequest(Arc<SyncRequestFn>),
    Async(Arc<dyn AsyncAuthorize>),
    AsyncRequest(Arc<dyn AsyncAuthorizeRequest>),
}

impl Authorizer {
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&str, &str) -> bool + Send + Sync + 'static,
    {
        Self::Sync(Arc::new(f))
    }

    pub fn sync_with_request<F>(f: F) -> Self
    where
        F: Fn(&str, &str, &Parts) -> bool + Send + Sync + 'static,
    {
        Self::SyncRequest(Arc::new(f))
    }

    /// Async policy from a closure returning a future.
    ///
    /// ```ignore
    /// let authorizer = Authorizer::future(|user, pass| async move {
    ///     directory.check(&user, &pass).await
    /// });
    /// ```
    pub fn future<F, Fut, E>(f: F) -> Self
    where
        F: Fn(String, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool, E>> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        Self::Async(Arc::new(FnAuthorizer(f)))
    }

    pub fn from_async<A: AsyncAuthorize + 'static>(authorizer: A) -> Self {
        Self::Async(Arc::new(authorizer))
    }

    pub fn from_async_request<A: AsyncAuthorizeRequest + 'static>(authorizer: A) -> Self {
        Self::AsyncRequest(Arc::new(authorizer))
    }

    /// Async policy that reports through a single-use [`Completion`].
    ///
    /// The gate waits until the completion is resolved, with no timeout.
    /// Dropping it unresolved is reported as [`AuthorizerError::Abandoned`].
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(String, String, Completion) + Send + Sync + 'static,
    {
        Self::Async(Arc::new(CallbackAuthorizer(f)))
    }

    /// Like [`Authorizer::callback`], but the callback also sees the request.
    ///
    /// `parts` is only borrowed for the duration of the call; copy out what
    /// the deferred work needs before moving the completion elsewhere.
    pub fn callback_with_request<F>(f: F) -> Self
    where
        F: Fn(String, String, &Parts, Completion) + Send + Sync + 'static,
    {
        Self::AsyncRequest(Arc::new(CallbackRequestAuthorizer(f)))
    }

    pub(crate) async fn run(
        &self,
        username: &str,
        password: &str,
        parts: &Parts,
    ) -> Result<bool, AuthorizerError> {
        let result = match self {
            Authorizer::Users(users) => return Ok(users.authorize(username, password)),
            Authorizer::Sync(f) => return Ok(f(username, password)),
            Authorizer::SyncRequest(f) => return Ok(f(username, password, parts)),
            Authorizer::Async(a) => a.authorize(username, password).await,
            Authorizer::AsyncRequest(a) => a.authorize(username, password, parts).await,
        };

        result.map_err(|err| match err.downcast::<AuthorizerError>() {
            Ok(err) => *err,
            Err(err) => AuthorizerError::Failed(err),
        })
    }
}

impl std::fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Authorizer::Users(users) => f.debug_tuple("Users").field(users).finish(),
            Authorizer::Sync(_) => f.write_str("Sync"),
            Authorizer::SyncRequest(_) => f.write_str("SyncRequest"),
            Authorizer::Async(_) => f.write_str("Async"),
            Authorizer::AsyncRequest(_) => f.write_str("AsyncRequest"),
        }
    }
}

impl From<UserTable> for Authorizer {
    fn from(users: UserTable) -> Self {
        Self::Users(users)
    }
}

/// Single-use handle resolving a callback-style authorization.
///
/// Every method consumes the handle, so it can be resolved at most once.
#[derive(Debug)]
pub struct Completion {
    tx: oneshot::Sender<Result<bool, BoxError>>,
}

impl Completion {
    pub fn approve(self) {
        self.complete(Ok(true));
    }

    pub fn deny(self) {
        self.complete(Ok(false));
    }

    pub fn fail(self, err: impl Into<BoxError>) {
        self.complete(Err(err.into()));
    }

    pub fn complete(self, result: Result<bool, BoxError>) {
        // receiver gone means the request was dropped mid-flight
        let _ = self.tx.send(result);
    }
}

struct FnAuthorizer<F>(F);

#[async_trait]
impl<F, Fut, E> AsyncAuthorize for FnAuthorizer<F>
where
    F: Fn(String, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<bool, E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    async fn authorize(&self, username: &str, password: &str) -> Result<bool, BoxError> {
        (self.0)(username.to_owned(), password.to_owned())
            .await
            .map_err(Into::into)
    }
}

struct CallbackAuthorizer<F>(F);

#[async_trait]
impl<F> AsyncAuthorize for CallbackAuthorizer<F>
where
    F: Fn(String, String, Completion) + Send + Sync + 'static,
{
    async fn authorize(&self, username: &str, password: &str) -> Result<bool, BoxError> {
        let (tx, rx) = oneshot::channel();
        (self.0)(username.to_owned(), password.to_owned(), Completion { tx });
        rx.await.map_err(|_| Box::new(AuthorizerError::Abandoned) as BoxError)?
    }
}

struct CallbackRequestAuthorizer<F>(F);

#[async_trait]
impl<F> AsyncAuthorizeRequest for CallbackRequestAuthorizer<F>
where
    F: Fn(String, String, &Parts, Completion) + Send + Sync + 'static,
{
    async fn authorize(
        &self,
        username: &str,
        password: &str,
        parts: &Parts,
    ) -> Result<bool, BoxError> {
        let (tx, rx) = oneshot::channel();
        (self.0)(username.to_owned(), password.to_owned(), parts, Completion { tx });
        rx.await.map_err(|_| Box::new(AuthorizerError::Abandoned) as BoxError)?
    }
}
