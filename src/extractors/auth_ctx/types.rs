/*
 * Responsibility
 * - The credentials a request presented, as seen by handlers
 * - The gate inserts it into request extensions once, before the authorizer runs
 *
 * Notes
 * - `None` fields mean the request carried no usable credentials and the gate
 *   was configured to still run the authorizer
 */

#[derive(Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub user: Option<String>,
    pub password: Option<String>,
}

impl AuthCtx {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            password: Some(password.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self {
            user: None,
            password: None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.user.is_none()
    }
}

impl std::fmt::Debug for AuthCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthCtx")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
