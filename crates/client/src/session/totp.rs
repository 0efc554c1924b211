//! Time-based one-time codes for two-factor login.

use chrono::{DateTime, Utc};
use totp_rs::{Algorithm, Secret, TOTP};

use crate::error::PortalError;

/// Code length expected by the portal
const DIGITS: usize = 6;

/// Seconds per code
const STEP_SECS: u64 = 30;

/// Derive the one-time code for `seed` at instant `at`
///
/// The seed is the base32 secret shown when two-factor login was enrolled.
/// Case, whitespace and `=` padding are ignored.
///
/// # Errors
///
/// Returns [`PortalError::OneTimeCode`] if the seed is not base32 or `at`
/// precedes the Unix epoch.
pub fn generate(seed: &str, at: DateTime<Utc>) -> Result<String, PortalError> {
    let normalized: String = seed
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '=')
        .map(|c| c.to_ascii_uppercase())
        .collect();

    let secret = Secret::Encoded(normalized)
        .to_bytes()
        .map_err(|e| PortalError::OneTimeCode(format!("seed is not valid base32 ({e:?})")))?;

    let timestamp = u64::try_from(at.timestamp())
        .map_err(|_| PortalError::OneTimeCode(format!("{at} precedes the Unix epoch")))?;

    let totp = TOTP::new_unchecked(Algorithm::SHA1, DIGITS, 1, STEP_SECS, secret);
    Ok(totp.generate(timestamp))
}
