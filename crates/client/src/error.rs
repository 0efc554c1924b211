//! Portal client error types.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while talking to the portal or driving the issuance workflow
#[derive(Error, Debug)]
pub enum PortalError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Portal answered {status} on {path}")]
    Status { path: String, status: StatusCode },

    #[error("Unexpected response body from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Invalid portal URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Anti-forgery token not found in portal markup")]
    TokenNotFound,

    #[error("Malformed bearer token: {0}")]
    MalformedToken(String),

    #[error("Portal rejected the login (status {status})")]
    InvalidCredentials { status: StatusCode },

    #[error("Cannot derive one-time code: {0}")]
    OneTimeCode(String),

    #[error("No pending review matches transaction {transaction_id}")]
    WorkflowMismatch { transaction_id: String },

    #[error("Certificate for transaction {transaction_id} has no PEM bundle")]
    CertificateUnavailable { transaction_id: String },

    #[error("Session has not been authenticated yet")]
    NoSession,

    #[error("Session manager is shut down")]
    SessionClosed,

    #[error("Renewal scheduler failed: {0}")]
    Scheduler(String),
}

impl PortalError {
    /// Whether this is a network or HTTP layer failure rather than a
    /// protocol or workflow failure.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            PortalError::Transport(_)
                | PortalError::Status { .. }
                | PortalError::Decode { .. }
                | PortalError::InvalidUrl(_)
        )
    }
}
