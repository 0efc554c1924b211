//! Authenticated portal operations
//!
//! Every operation first makes sure the session is fresh, then issues a
//! single request through the current session's transport. Nothing is
//! retried.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use harica_models::{
    CertificateQuery, CertificateRecord, CertificateRequestReceipt, DomainCheck, DomainName,
    OrganizationMatch, ReviewQuery, ReviewRecord,
};
use reqwest::multipart::Form;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::endpoints;
use crate::error::PortalError;
use crate::session::{Session, SessionManager};

/// The portal calls the issuance workflow is built from
#[async_trait]
pub trait PortalOperations: Send + Sync {
    /// Check whether each domain may be certified by this account
    async fn check_domain_names(&self, domains: &[String]) -> Result<Vec<DomainCheck>, PortalError>;

    /// List organizations this account may certify the domains under
    async fn check_matching_organization(
        &self,
        domains: &[String],
    ) -> Result<Vec<OrganizationMatch>, PortalError>;

    /// Submit a server certificate request built from domain check results
    async fn request_certificate(
        &self,
        domains: &[DomainCheck],
        csr: &str,
        transaction_type: &str,
    ) -> Result<CertificateRequestReceipt, PortalError>;

    /// Fetch an issued certificate by transaction id
    async fn get_certificate(&self, transaction_id: &str) -> Result<CertificateRecord, PortalError>;

    /// List transactions awaiting this validator's review
    async fn get_pending_reviews(&self) -> Result<Vec<ReviewRecord>, PortalError>;

    /// Approve one review sub-item
    async fn approve_review(&self, review_id: &str, message: &str, value: &str) -> Result<(), PortalError>;
}

/// [`PortalOperations`] backed by a live portal session
#[derive(Debug, Clone)]
pub struct CertificateOperations {
    session: Arc<SessionManager>,
}

impl CertificateOperations {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Revocation reasons offered by the portal, as raw JSON
    pub async fn revocation_reasons(&self) -> Result<Value, PortalError> {
        let session = self.fresh_session().await?;
        let reasons = session
            .transport()
            .post_empty(endpoints::REVOCATION_REASONS)
            .await?;
        Ok(reasons)
    }

    /// Domain validations on record for this account, as raw JSON
    pub async fn domain_validations(&self) -> Result<Value, PortalError> {
        let session = self.fresh_session().await?;
        let validations = session
            .transport()
            .post_empty(endpoints::DOMAIN_VALIDATIONS)
            .await?;
        Ok(validations)
    }

    /// Renew if due, then return the current session
    ///
    /// A failed renewal does not block the call while the published token
    /// has not expired yet.
    async fn fresh_session(&self) -> Result<Arc<Session>, PortalError> {
        match self.session.ensure_fresh().await {
            Ok(()) => self.session.current(),
            Err(PortalError::SessionClosed) => Err(PortalError::SessionClosed),
            Err(e) => match self.session.current() {
                Ok(session) if session.expires_at() > Utc::now() => {
                    warn!(
                        error = %e,
                        expires_at = %session.expires_at(),
                        "Session renewal failed, continuing with unexpired session"
                    );
                    Ok(session)
                }
                _ => Err(e),
            },
        }
    }
}

fn domain_names(domains: &[String]) -> Vec<DomainName> {
    domains.iter().map(|d| DomainName::from(d.as_str())).collect()
}

#[async_trait]
impl PortalOperations for CertificateOperations {
    async fn check_domain_names(&self, domains: &[String]) -> Result<Vec<DomainCheck>, PortalError> {
        let session = self.fresh_session().await?;
        debug!(domain_count = domains.len(), "Checking domain names");

        let checks = session
            .transport()
            .post_json(endpoints::CHECK_DOMAIN_NAMES, &domain_names(domains))
            .await?;
        Ok(checks)
    }

    async fn check_matching_organization(
        &self,
        domains: &[String],
    ) -> Result<Vec<OrganizationMatch>, PortalError> {
        let session = self.fresh_session().await?;
        debug!(domain_count = domains.len(), "Checking matching organizations");

        let organizations = session
            .transport()
            .post_json(endpoints::CHECK_MATCHING_ORGANIZATION, &domain_names(domains))
            .await?;
        Ok(organizations)
    }

    async fn request_certificate(
        &self,
        domains: &[DomainCheck],
        csr: &str,
        transaction_type: &str,
    ) -> Result<CertificateRequestReceipt, PortalError> {
        let session = self.fresh_session().await?;
        let domains_json = serde_json::to_string(domains).map_err(PortalError::Encode)?;

        let form = Form::new()
            .text("domains", domains_json.clone())
            .text("domainsString", domains_json)
            .text("csr", csr.to_string())
            .text("isManualCsr", "true")
            .text("consentSameKey", "true")
            .text("transactionType", transaction_type.to_string())
            .text("duration", "1");

        let receipt: CertificateRequestReceipt = session
            .transport()
            .post_form(endpoints::REQUEST_SERVER_CERTIFICATE, form)
            .await?;

        info!(
            transaction_id = %receipt.transaction_id,
            transaction_type = %transaction_type,
            "Certificate requested"
        );
        Ok(receipt)
    }

    async fn get_certificate(&self, transaction_id: &str) -> Result<CertificateRecord, PortalError> {
        let session = self.fresh_session().await?;
        debug!(transaction_id = %transaction_id, "Fetching certificate");

        let certificate = session
            .transport()
            .post_json(endpoints::GET_CERTIFICATE, &CertificateQuery { id: transaction_id })
            .await?;
        Ok(certificate)
    }

    async fn get_pending_reviews(&self) -> Result<Vec<ReviewRecord>, PortalError> {
        let session = self.fresh_session().await?;

        let reviews: Vec<ReviewRecord> = session
            .transport()
            .post_json(endpoints::PENDING_REVIEWS, &ReviewQuery::pending())
            .await?;

        debug!(review_count = reviews.len(), "Listed pending reviews");
        Ok(reviews)
    }

    async fn approve_review(&self, review_id: &str, message: &str, value: &str) -> Result<(), PortalError> {
        let session = self.fresh_session().await?;

        let form = Form::new()
            .text("reviewId", review_id.to_string())
            .text("isValid", "true")
            .text("informApplicant", "true")
            .text("reviewMessage", message.to_string())
            .text("reviewValue", value.to_string());

        session
            .transport()
            .submit_form(endpoints::UPDATE_REVIEWS, form)
            .await?;

        info!(review_id = %review_id, "Review approved");
        Ok(())
    }
}
