//! Two-party certificate issuance
//!
//! The requester asks for a certificate, the validator approves the review
//! the request produced, and the requester collects the result. The two
//! sides only share the transaction id returned by the request.

use tracing::{debug, info, warn};

use crate::error::PortalError;
use crate::operations::PortalOperations;

/// Message attached to every approval
pub const APPROVAL_MESSAGE: &str = "Auto Approval";

/// What to issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuanceRequest {
    pub domains: Vec<String>,
    /// PEM encoded CSR, passed through untouched
    pub csr: String,
    /// Validation level, e.g. `DV`
    pub transaction_type: String,
}

impl IssuanceRequest {
    pub fn new(domains: Vec<String>, csr: impl Into<String>, transaction_type: impl Into<String>) -> Self {
        Self {
            domains,
            csr: csr.into(),
            transaction_type: transaction_type.into(),
        }
    }
}

/// Drives a request from submission to the issued PEM bundle
#[derive(Debug)]
pub struct IssuanceOrchestrator<R, V> {
    requester: R,
    validator: V,
}

impl<R, V> IssuanceOrchestrator<R, V>
where
    R: PortalOperations,
    V: PortalOperations,
{
    pub fn new(requester: R, validator: V) -> Self {
        Self { requester, validator }
    }

    pub fn requester(&self) -> &R {
        &self.requester
    }

    pub fn validator(&self) -> &V {
        &self.validator
    }

    /// Request, approve and fetch a certificate
    ///
    /// The pending review listing is read once, right after the request; a
    /// review that has not appeared yet is reported as
    /// [`PortalError::WorkflowMismatch`]. The first failing step aborts the
    /// run and earlier steps are not undone.
    pub async fn issue(&self, request: &IssuanceRequest) -> Result<String, PortalError> {
        let checks = self.requester.check_domain_names(&request.domains).await?;
        debug!(domain_count = checks.len(), "Domain names checked");

        let receipt = self
            .requester
            .request_certificate(&checks, &request.csr, &request.transaction_type)
            .await?;
        let transaction_id = receipt.transaction_id;

        let reviews = self.validator.get_pending_reviews().await?;
        let matching: Vec<_> = reviews
            .iter()
            .filter(|review| review.transaction_id == transaction_id)
            .collect();

        if matching.is_empty() {
            warn!(
                transaction_id = %transaction_id,
                pending = reviews.len(),
                "No pending review for transaction"
            );
            return Err(PortalError::WorkflowMismatch { transaction_id });
        }

        let mut approved = 0usize;
        for item in matching.iter().flat_map(|review| &review.review_items) {
            self.validator
                .approve_review(&item.review_id, APPROVAL_MESSAGE, &item.review_value)
                .await?;
            approved += 1;
        }
        info!(transaction_id = %transaction_id, approved, "Transaction reviews approved");

        let certificate = self.requester.get_certificate(&transaction_id).await?;
        if certificate.pem_bundle.is_empty() {
            return Err(PortalError::CertificateUnavailable { transaction_id });
        }

        info!(transaction_id = %transaction_id, "Certificate issued");
        Ok(certificate.pem_bundle)
    }
}
