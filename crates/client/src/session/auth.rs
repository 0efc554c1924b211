//! Login handshake
//!
//! A login always starts from a fresh, unauthenticated transport: scrape an
//! anti-forgery token, post the credentials (with a one-time code when a
//! seed is configured), then read the bearer token's expiry. The resulting
//! [`Session`] carries a transport derived from the same cookie jar.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use harica_models::LoginRequest;
use tracing::{debug, info};

use super::{anti_forgery, token, totp};
use crate::config::PortalConfig;
use crate::endpoints;
use crate::error::PortalError;
use crate::transport::PortalTransport;

/// Login identity for one portal account
///
/// Held in memory for the lifetime of a session manager so renewal can log
/// in again. `Debug` output never includes the password or seed.
#[derive(Clone)]
pub struct Credentials {
    email: String,
    password: String,
    totp_seed: Option<String>,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            totp_seed: None,
        }
    }

    /// Enable two-factor login with a base32 seed
    ///
    /// A blank seed leaves two-factor login disabled.
    pub fn with_totp_seed(mut self, seed: impl Into<String>) -> Self {
        let seed = seed.into();
        self.totp_seed = (!seed.trim().is_empty()).then_some(seed);
        self
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn has_totp(&self) -> bool {
        self.totp_seed.is_some()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("totp_seed", &self.totp_seed.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// An authenticated portal session
///
/// Immutable once built. Renewal replaces the whole value.
#[derive(Clone)]
pub struct Session {
    token: String,
    expires_at: DateTime<Utc>,
    transport: PortalTransport,
}

impl Session {
    /// Bearer token as issued by the portal
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Expiry read from the token's `exp` claim
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Transport that sends authenticated requests for this session
    pub fn transport(&self) -> &PortalTransport {
        &self.transport
    }

    /// Whether this session is due for renewal at `now`
    pub fn needs_renewal(&self, now: DateTime<Utc>, refresh_interval: Duration) -> bool {
        token::needs_renewal(self.expires_at, now, refresh_interval)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("transport", &self.transport)
            .finish()
    }
}

/// Performs the portal login handshake
#[derive(Debug, Clone)]
pub struct Authenticator {
    config: PortalConfig,
}

impl Authenticator {
    pub fn new(config: PortalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    /// Log in and build a session
    ///
    /// # Errors
    ///
    /// Fails with [`PortalError::TokenNotFound`] when the landing page lacks
    /// an anti-forgery token, [`PortalError::OneTimeCode`] when the seed is
    /// unusable, [`PortalError::InvalidCredentials`] when the portal refuses
    /// the login and [`PortalError::MalformedToken`] when the returned token
    /// has no readable expiry.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Session, PortalError> {
        let transport = PortalTransport::new(&self.config)?;
        let verification_token = anti_forgery::fetch(&transport).await?;

        let code = credentials
            .totp_seed
            .as_deref()
            .map(|seed| totp::generate(seed, Utc::now()))
            .transpose()?;

        let path = if code.is_some() {
            endpoints::LOGIN_TWO_FACTOR
        } else {
            endpoints::LOGIN
        };

        let request = LoginRequest {
            email: &credentials.email,
            password: &credentials.password,
            token: code.as_deref(),
        };

        debug!(email = %credentials.email, two_factor = code.is_some(), "Logging in to portal");
        let body = transport.login(path, &verification_token, &request).await?;

        let bearer = unquote(&body);
        let expires_at = token::extract_expiry(bearer)?;

        info!(
            email = %credentials.email,
            expires_at = %expires_at,
            "Portal session established"
        );

        Ok(Session {
            token: bearer.to_string(),
            expires_at,
            transport: transport.authenticated(bearer),
        })
    }
}

/// Strip the JSON string quoting around the login response
fn unquote(body: &str) -> &str {
    body.trim().trim_matches('"')
}
