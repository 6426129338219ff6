/*
 * Responsibility
 * - Outcome of a gate decision (Allow / Deny)
 * - 401 response synthesis: status, optional challenge, text or JSON body
 */
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::Value;

#[derive(Debug)]
pub enum Decision {
    Allow,
    Deny(Rejection),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Body of a 401. Text is sent as `text/plain`, anything else as JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum UnauthorizedBody {
    Text(String),
    Json(Value),
}

impl Default for UnauthorizedBody {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for UnauthorizedBody {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for UnauthorizedBody {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Value> for UnauthorizedBody {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s),
            other => Self::Json(other),
        }
    }
}

/// A denial, ready to be written as a 401 response.
#[derive(Debug)]
pub struct Rejection {
    pub body: UnauthorizedBody,
    /// `WWW-Authenticate` value, present only when challenges are enabled.
    pub challenge: Option<HeaderValue>,
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let mut response = match self.body {
            UnauthorizedBody::Text(text) => (StatusCode::UNAUTHORIZED, text).into_response(),
            UnauthorizedBody::Json(value) => {
                (StatusCode::UNAUTHORIZED, Json(value)).into_response()
            }
        };

        if let Some(challenge) = self.challenge {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, challenge);
        }

        response
    }
}

/// `Basic realm="<realm>"`, or bare `Basic` when the realm is absent or empty.
///
/// The realm is inserted verbatim. Returns `None` if it cannot be a header value.
pub fn challenge_value(realm: Option<&str>) -> Option<HeaderValue> {
    match realm.filter(|r| !r.is_empty()) {
        Some(realm) => HeaderValue::from_str(&format!("Basic realm=\"{realm}\"")).ok(),
        None => Some(HeaderValue::from_static("Basic")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn challenge_without_realm_is_bare_basic() {
        assert_eq!(challenge_value(None).expect("header"), "Basic");
        assert_eq!(challenge_value(Some("")).expect("header"), "Basic");
    }

    #[test]
    fn challenge_with_realm_is_quoted_verbatim() {
        assert_eq!(
            challenge_value(Some("test")).expect("header"),
            "Basic realm=\"test\""
        );
        assert_eq!(
            challenge_value(Some("my \"app\"")).expect("header"),
            "Basic realm=\"my \"app\"\""
        );
    }

    #[test]
    fn challenge_with_unencodable_realm_is_none() {
        assert!(challenge_value(Some("line\nbreak")).is_none());
    }

    #[test]
    fn json_string_becomes_text() {
        assert_eq!(
            UnauthorizedBody::from(json!("nope")),
            UnauthorizedBody::Text("nope".into())
        );
        assert_eq!(
            UnauthorizedBody::from(json!({"foo": "bar"})),
            UnauthorizedBody::Json(json!({"foo": "bar"}))
        );
    }

    #[test]
    fn rejection_is_401_with_optional_challenge() {
        let response = Rejection {
            body: UnauthorizedBody::default(),
            challenge: None,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());

        let response = Rejection {
            body: "denied".into(),
            challenge: challenge_value(Some("ops")),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers()[header::WWW_AUTHENTICATE],
            "Basic realm=\"ops\""
        );
    }

    #[test]
    fn json_rejection_sets_json_content_type() {
        let response = Rejection {
            body: json!({"foo": "bar"}).into(),
            challenge: None,
        }
        .into_response();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
    }
}
