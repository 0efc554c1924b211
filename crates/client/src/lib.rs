//! HARICA Portal Client Library
//!
//! Automates certificate issuance against the HARICA certificate manager
//! with two accounts: a requester who asks for a server certificate and a
//! validator who approves the resulting review.
//!
//! - **Sessions**: login with optional two-factor codes, expiry tracking and
//!   background renewal
//! - **Operations**: domain checks, certificate requests and retrieval,
//!   review listing and approval
//! - **Orchestration**: the request, approve, fetch workflow across both
//!   accounts
//!
//! # Example
//!
//! ```ignore
//! use harica_client::{
//!     CertificateOperations, Credentials, IssuanceOrchestrator, IssuanceRequest, PortalConfig,
//!     SessionManager,
//! };
//!
//! let config = PortalConfig::default();
//! let requester = SessionManager::connect(config.clone(), Credentials::new("req@example.org", "pw")).await?;
//! let validator = SessionManager::connect(config, Credentials::new("val@example.org", "pw")).await?;
//!
//! let orchestrator = IssuanceOrchestrator::new(
//!     CertificateOperations::new(requester),
//!     CertificateOperations::new(validator),
//! );
//! let pem = orchestrator
//!     .issue(&IssuanceRequest::new(vec!["example.org".into()], csr, "DV"))
//!     .await?;
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
pub mod endpoints;
pub mod error;
pub mod operations;
pub mod orchestrator;
pub mod session;
pub mod transport;

// ============================================================================
// Public API Re-exports
// ============================================================================

// Configuration
pub use config::{PortalConfig, DEFAULT_BASE_URL, DEFAULT_REFRESH_INTERVAL, DEFAULT_REQUEST_TIMEOUT};

// Error handling
pub use error::PortalError;

// Sessions
pub use session::{Authenticator, Credentials, RenewalScheduler, Session, SessionManager, SessionState};

// Operations
pub use operations::{CertificateOperations, PortalOperations};

// Orchestration
pub use orchestrator::{IssuanceOrchestrator, IssuanceRequest, APPROVAL_MESSAGE};

// Transport
pub use transport::PortalTransport;

// Portal data types
pub use harica_models as models;
