//! Login request bodies.

use serde::Serialize;

/// Body of both login endpoints.
///
/// The one-time code is only sent to the two-factor endpoint; the
/// password-only endpoint receives `{email, password}`.
#[derive(Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<&'a str>,
}

impl std::fmt::Debug for LoginRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("has_token", &self.token.is_some())
            .finish()
    }
}
