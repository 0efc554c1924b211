//! Certificate requests and issued certificates.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::null_as_default;

/// Answer to `RequestServerCertificate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateRequestReceipt {
    /// Transaction identifier shared with the validator's review listing
    #[serde(rename = "id", deserialize_with = "null_as_default")]
    pub transaction_id: String,
    #[serde(rename = "requiresConsentKey", deserialize_with = "null_as_default")]
    pub requires_consent_key: bool,
}

/// Body of `GetCertificate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateQuery<'a> {
    pub id: &'a str,
}

/// An issued certificate as returned by `GetCertificate`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateRecord {
    #[serde(rename = "pKCS7", deserialize_with = "null_as_default")]
    pub pkcs7: String,
    #[serde(deserialize_with = "null_as_default")]
    pub certificate: String,
    /// Leaf and chain as concatenated PEM blocks
    #[serde(rename = "pemBundle", deserialize_with = "null_as_default")]
    pub pem_bundle: String,
    #[serde(rename = "dN", deserialize_with = "null_as_default")]
    pub dn: String,
    #[serde(rename = "sANS", deserialize_with = "null_as_default")]
    pub sans: String,
    #[serde(rename = "revocationCode", deserialize_with = "null_as_default")]
    pub revocation_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub serial: String,
    #[serde(rename = "isRevoked", deserialize_with = "null_as_default")]
    pub is_revoked: bool,
    #[serde(rename = "revokedAt")]
    pub revoked_at: Option<Value>,
    #[serde(rename = "validFrom", deserialize_with = "null_as_default")]
    pub valid_from: String,
    #[serde(rename = "validTo", deserialize_with = "null_as_default")]
    pub valid_to: String,
    #[serde(rename = "issuerDN", deserialize_with = "null_as_default")]
    pub issuer_dn: String,
    #[serde(rename = "authorizationDomains", deserialize_with = "null_as_default")]
    pub authorization_domains: String,
    #[serde(rename = "keyType", deserialize_with = "null_as_default")]
    pub key_type: String,
    #[serde(rename = "friendlyName")]
    pub friendly_name: Option<Value>,
    pub approver: Option<Value>,
    #[serde(rename = "approversAddress")]
    pub approvers_address: Option<Value>,
    #[serde(rename = "tokenDeviceId")]
    pub token_device_id: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub orders: Vec<CertificateOrder>,
    #[serde(rename = "needsImportWithFortify", deserialize_with = "null_as_default")]
    pub needs_import_with_fortify: bool,
    #[serde(rename = "isTokenCertificate", deserialize_with = "null_as_default")]
    pub is_token_certificate: bool,
    #[serde(rename = "issuerCertificate", deserialize_with = "null_as_default")]
    pub issuer_certificate: String,
    #[serde(rename = "transactionId")]
    pub transaction_id: Option<Value>,
}

/// Order entry attached to an issued certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CertificateOrder {
    #[serde(deserialize_with = "null_as_default")]
    pub order_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_chained_transaction: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub issued_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub duration: i64,
}
