//! HARICA portal data-transfer types
//!
//! The field sets and their casing are dictated by the portal's JSON API,
//! including its own irregular names (`dN`, `sANS`, `pKCS7`). Every field
//! tolerates absence and `null` so that a portal-side schema change does not
//! break deserialization.
//!
//! - [`auth`] - login request bodies
//! - [`domain`] - domain name checks and organization matches
//! - [`certificate`] - certificate requests and issued certificates
//! - [`review`] - validator review listings and their sub-items

pub mod auth;
pub mod certificate;
pub mod domain;
pub mod review;

pub use auth::LoginRequest;
pub use certificate::{
    CertificateOrder, CertificateQuery, CertificateRecord, CertificateRequestReceipt,
};
pub use domain::{DomainCheck, DomainName, OrganizationMatch};
pub use review::{ReviewDomain, ReviewItem, ReviewQuery, ReviewRecord, PENDING_STATUS};

use serde::{Deserialize, Deserializer};

/// Reads a value, treating JSON `null` like an absent field.
///
/// The portal sends `null` for empty strings and empty lists on several
/// endpoints.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
