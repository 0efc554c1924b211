//! Bearer token expiry
//!
//! The bearer token is a JWT signed by the portal. The portal is the trust
//! root and does not publish its verification key, so the client reads the
//! claims without checking the signature. [`extract_expiry`] is the only
//! place that does so.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, Validation};
use serde::Deserialize;

use crate::error::PortalError;

#[derive(Debug, Deserialize)]
struct ExpiryClaim {
    exp: Option<i64>,
}

/// Read the `exp` claim of a bearer token without verifying its signature
///
/// # Errors
///
/// Returns [`PortalError::MalformedToken`] if the token is not a JWT, its
/// claims do not parse, or it carries no usable `exp`.
pub fn extract_expiry(token: &str) -> Result<DateTime<Utc>, PortalError> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = jsonwebtoken::decode::<ExpiryClaim>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| PortalError::MalformedToken(e.to_string()))?;

    let exp = data
        .claims
        .exp
        .ok_or_else(|| PortalError::MalformedToken("missing exp claim".to_string()))?;

    DateTime::from_timestamp(exp, 0)
        .ok_or_else(|| PortalError::MalformedToken(format!("exp claim {exp} out of range")))
}

/// Whether a token expiring at `expires_at` must be renewed at `now`
///
/// True once `now` is within one refresh interval of expiry, or past it.
pub fn needs_renewal(expires_at: DateTime<Utc>, now: DateTime<Utc>, refresh_interval: Duration) -> bool {
    let window = TimeDelta::from_std(refresh_interval).unwrap_or(TimeDelta::MAX);
    match expires_at.checked_sub_signed(window) {
        Some(threshold) => now >= threshold,
        None => true,
    }
}
