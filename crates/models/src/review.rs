//! Validator review listings.
//!
//! A [`ReviewRecord`] is one transaction awaiting review; its
//! [`ReviewItem`]s (`reviewGetDTOs` on the wire) are the units a validator
//! approves one by one.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::null_as_default;

/// Status filter for transactions still awaiting a validator.
pub const PENDING_STATUS: &str = "Pending";

/// Body of `GetSSLReviewableTransactions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewQuery {
    pub start_index: u32,
    pub status: String,
    #[serde(rename = "filterPostDTOs")]
    pub filter_post_dtos: Vec<Value>,
}

impl ReviewQuery {
    /// First page of pending reviews, unfiltered.
    pub fn pending() -> Self {
        Self {
            start_index: 0,
            status: PENDING_STATUS.to_string(),
            filter_post_dtos: Vec::new(),
        }
    }
}

/// A reviewable transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReviewRecord {
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub transaction_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chained_transaction_id: Option<Value>,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub transaction_type_name: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub transaction_status: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub transaction_status_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Value>,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub organization: String,
    #[serde(deserialize_with = "null_as_default")]
    pub purchase_duration: i64,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub additional_emails: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub user_email: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<Value>,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub review_value: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub review_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<Value>,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub requested_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<Value>,
    #[serde(rename = "dN", skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub dn: String,
    #[serde(deserialize_with = "null_as_default")]
    pub has_review: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub can_renew: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_revoked: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_paid: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_eidas_validated: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_eidas_validation: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_high_risk: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_short_term: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_expired: Option<Value>,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub issued_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_valid_to: Option<Value>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub domains: Vec<ReviewDomain>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validations: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chained_transactions: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csr_type: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceptance_retrieval_at: Option<Value>,
    #[serde(
        rename = "reviewGetDTOs",
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub review_items: Vec<ReviewItem>,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub user_description: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub user_organization: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub transaction_type: String,
    #[serde(rename = "isPendingP12", skip_serializing_if = "Option::is_none")]
    pub is_pending_p12: Option<Value>,
}

/// Domain listed under a reviewable transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewDomain {
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub fqdn: String,
    #[serde(rename = "includesWWW", deserialize_with = "null_as_default")]
    pub includes_www: bool,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub validations: Vec<Value>,
}

/// One independently approvable review unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReviewItem {
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub review_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_validated: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_reviewed: bool,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub user_updated_at: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub reviewed_at: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub review_value: String,
    #[serde(
        rename = "validatorReviewGetDTOs",
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub validator_reviews: Vec<Value>,
}
