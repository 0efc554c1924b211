//! Domain name checks and organization matches.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::null_as_default;

/// A single domain as submitted to the domain check endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainName {
    pub domain: String,
}

impl From<&str> for DomainName {
    fn from(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
        }
    }
}

/// Per-domain eligibility as reported by `CheckDomainNames`.
///
/// These records are sent back verbatim inside a certificate request, so any
/// field the portal adds beyond the modelled ones is kept in `extra` and
/// re-serialized untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainCheck {
    pub domain: String,
    #[serde(rename = "isValid", deserialize_with = "null_as_default")]
    pub is_valid: bool,
    #[serde(rename = "includeWWW", deserialize_with = "null_as_default")]
    pub include_www: bool,
    #[serde(rename = "errorMessage")]
    pub error_message: Option<String>,
    #[serde(rename = "warningMessage")]
    pub warning_message: Option<String>,
    #[serde(rename = "isPrevalidated", deserialize_with = "null_as_default")]
    pub is_prevalidated: bool,
    #[serde(rename = "isWildcard", deserialize_with = "null_as_default")]
    pub is_wildcard: bool,
    #[serde(rename = "isFreeDomain", deserialize_with = "null_as_default")]
    pub is_free_domain: bool,
    #[serde(rename = "isFreeDomainDV", deserialize_with = "null_as_default")]
    pub is_free_domain_dv: bool,
    #[serde(rename = "isFreeDomainEV", deserialize_with = "null_as_default")]
    pub is_free_domain_ev: bool,
    #[serde(rename = "canRequestOV", deserialize_with = "null_as_default")]
    pub can_request_ov: bool,
    #[serde(rename = "canRequestEV", deserialize_with = "null_as_default")]
    pub can_request_ev: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Organization record returned by `CheckMachingOrganization`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrganizationMatch {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub organization_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub organization_unit_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(deserialize_with = "null_as_default")]
    pub locality: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(deserialize_with = "null_as_default")]
    pub dn: String,
    #[serde(deserialize_with = "null_as_default")]
    pub organization_name_localized: String,
    #[serde(deserialize_with = "null_as_default")]
    pub organization_unit_name_localized: String,
    #[serde(deserialize_with = "null_as_default")]
    pub state_localized: String,
    #[serde(deserialize_with = "null_as_default")]
    pub locality_localized: String,
    #[serde(deserialize_with = "null_as_default")]
    pub organization_identifier: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_base_domain: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub jurisdiction_country: String,
    #[serde(deserialize_with = "null_as_default")]
    pub jurisdiction_state: String,
    #[serde(deserialize_with = "null_as_default")]
    pub jurisdiction_locality: String,
    #[serde(deserialize_with = "null_as_default")]
    pub business_category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub serial: String,
    pub group_domains: Option<Value>,
}
