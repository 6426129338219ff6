//! Basic-auth decision engine.
//!
//! `BasicAuthGate` holds the immutable configuration and makes one decision
//! per request: parse credentials, attach them to the request, run the
//! authorizer, then allow or build a 401.

use std::sync::Arc;

use axum::http::{HeaderValue, request::Parts};
use tracing::{debug, error, warn};

use super::authorizer::Authorizer;
use super::basic;
use super::decision::{Decision, Rejection, UnauthorizedBody, challenge_value};
use super::error::{AuthorizerError, ConfigError};
use super::users::UserTable;
use crate::extractors::AuthCtx;

type RealmFn = dyn Fn(&Parts) -> Option<String> + Send + Sync;
type BodyFn = dyn Fn(&Parts) -> UnauthorizedBody + Send + Sync;

enum Realm {
    // precomputed at build time
    Fixed(HeaderValue),
    PerRequest(Arc<RealmFn>),
}

struct GateConfig {
    authorizer: Authorizer,
    challenge: bool,
    realm: Realm,
    allow_empty_credentials: bool,
    unauthorized_response: Option<Arc<BodyFn>>,
}

/// Shared, read-only gate. Clone is cheap (Arc).
#[derive(Clone)]
pub struct BasicAuthGate {
    config: Arc<GateConfig>,
}

impl BasicAuthGate {
    pub fn builder() -> BasicAuthGateBuilder {
        BasicAuthGateBuilder::default()
    }

    /// Decide whether the request may proceed.
    ///
    /// On any path that reaches the authorizer, an [`AuthCtx`] is inserted into
    /// `parts.extensions` first, so the authorizer, the 401 body builder and
    /// downstream handlers all see who was attempted.
    ///
    /// `Err` is an authorizer fault and must not be treated as a denial.
    pub async fn decide(&self, parts: &mut Parts) -> Result<Decision, AuthorizerError> {
        let config = &self.config;
        let credentials = basic::parse(&parts.headers);

        if credentials.is_none() && !config.allow_empty_credentials {
            debug!("missing or malformed basic credentials");
            return Ok(Decision::Deny(self.reject(parts)));
        }

        let ctx = match &credentials {
            Some(c) => AuthCtx::new(c.username.clone(), c.password.clone()),
            None => AuthCtx::anonymous(),
        };
        parts.extensions.insert(ctx);

        let (username, password) = credentials
            .as_ref()
            .map(|c| (c.username.as_str(), c.password.as_str()))
            .unwrap_or(("", ""));

        let approved = config
            .authorizer
            .run(username, password, parts)
            .await
            .inspect_err(|err| error!(error = %err, user = username, "authorizer fault"))?;

        if approved {
            debug!(user = username, "basic auth accepted");
            Ok(Decision::Allow)
        } else {
            debug!(user = username, "basic auth rejected");
            Ok(Decision::Deny(self.reject(parts)))
        }
    }

    fn reject(&self, parts: &Parts) -> Rejection {
        let config = &self.config;

        let challenge = if config.challenge {
            Some(self.challenge_for(parts))
        } else {
            None
        };

        let body = match &config.unauthorized_response {
            Some(f) => f(parts),
            None => UnauthorizedBody::default(),
        };

        Rejection { body, challenge }
    }

    fn challenge_for(&self, parts: &Parts) -> HeaderValue {
        match &self.config.realm {
            Realm::Fixed(value) => value.clone(),
            Realm::PerRequest(f) => {
                let realm = f(parts);
                challenge_value(realm.as_deref()).unwrap_or_else(|| {
                    warn!(?realm, "realm is not a valid header value, sending bare challenge");
                    HeaderValue::from_static("Basic")
                })
            }
        }
    }
}

impl std::fmt::Debug for BasicAuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuthGate")
            .field("authorizer", &self.config.authorizer)
            .field("challenge", &self.config.challenge)
            .field("allow_empty_credentials", &self.config.allow_empty_credentials)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
pub struct BasicAuthGateBuilder {
    users: Option<UserTable>,
    authorizer: Option<Authorizer>,
    challenge: bool,
    realm: Option<String>,
    realm_fn: Option<Arc<RealmFn>>,
    allow_empty_credentials: bool,
    unauthorized_response: Option<Arc<BodyFn>>,
}

impl BasicAuthGateBuilder {
    /// Static user table for the built-in policy. Ignored when an authorizer is set.
    /// An empty table is accepted and denies everything.
    pub fn users(mut self, users: UserTable) -> Self {
        self.users = Some(users);
        self
    }

    pub fn user(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.users
            .get_or_insert_with(UserTable::new)
            .insert(username, password);
        self
    }

    pub fn authorizer(mut self, authorizer: Authorizer) -> Self {
        self.authorizer = Some(authorizer);
        self
    }

    /// Send `WWW-Authenticate` on denial. Off by default.
    pub fn challenge(mut self, challenge: bool) -> Self {
        self.challenge = challenge;
        self
    }

    pub fn realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = Some(realm.into());
        self.realm_fn = None;
        self
    }

    pub fn realm_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&Parts) -> Option<String> + Send + Sync + 'static,
    {
        self.realm_fn = Some(Arc::new(f));
        self.realm = None;
        self
    }

    /// Run the authorizer with empty credentials instead of denying outright.
    pub fn allow_empty_credentials(mut self, allow: bool) -> Self {
        self.allow_empty_credentials = allow;
        self
    }

    pub fn unauthorized_response(mut self, body: impl Into<UnauthorizedBody>) -> Self {
        let body = body.into();
        self.unauthorized_response = Some(Arc::new(move |_: &Parts| body.clone()));
        self
    }

    pub fn unauthorized_response_fn<F, B>(mut self, f: F) -> Self
    where
        F: Fn(&Parts) -> B + Send + Sync + 'static,
        B: Into<UnauthorizedBody>,
    {
        self.unauthorized_response =
            Some(Arc::new(move |parts: &Parts| -> UnauthorizedBody { f(parts).into() }));
        self
    }

    pub fn build(self) -> Result<BasicAuthGate, ConfigError> {
        let authorizer = match (self.authorizer, self.users) {
            (Some(authorizer), users) => {
                if users.is_some() {
                    warn!("custom authorizer configured, static users are ignored");
                }
                authorizer
            }
            (None, Some(users)) => Authorizer::Users(users),
            (None, None) => {
                warn!("no users and no authorizer configured, every request will be denied");
                Authorizer::Users(UserTable::new())
            }
        };

        let realm = match (self.realm_fn, self.realm) {
            (Some(f), _) => Realm::PerRequest(f),
            (None, Some(realm)) => Realm::Fixed(
                challenge_value(Some(realm.as_str())).ok_or(ConfigError::InvalidRealm { realm })?,
            ),
            (None, None) => Realm::Fixed(HeaderValue::from_static("Basic")),
        };

        Ok(BasicAuthGate {
            config: Arc::new(GateConfig {
                authorizer,
                challenge: self.challenge,
                realm,
                allow_empty_credentials: self.allow_empty_credentials,
                unauthorized_response: self.unauthorized_response,
            }),
        })
    }
}
