//! Portal sessions
//!
//! # Components
//!
//! - [`anti_forgery`]: scrapes the portal's anti-forgery token from its landing page
//! - [`totp`]: one-time codes for two-factor login
//! - [`token`]: bearer token expiry and the renewal predicate
//! - [`auth`]: the login handshake producing a [`Session`]
//! - [`manager`]: owns the current session and renews it
//! - [`scheduler`]: background renewal task
//!
//! # Lifecycle
//!
//! ```text
//! Empty --login--> Active --expiry near--> Renewing --> Active
//!                     \                                   /
//!                      `------------ shutdown ---------> Closed
//! ```

pub mod anti_forgery;
pub mod auth;
pub mod manager;
pub mod scheduler;
pub mod token;
pub mod totp;

pub use auth::{Authenticator, Credentials, Session};
pub use manager::{SessionManager, SessionState};
pub use scheduler::RenewalScheduler;
