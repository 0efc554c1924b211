//! Session lifecycle
//!
//! The manager publishes the current [`Session`] as an immutable snapshot.
//! Readers load it without locking; renewal runs under an async mutex so
//! the check, login and swap happen as one step no matter whether an
//! operation or the scheduler triggered it.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use chrono::Utc;
use tracing::{info, trace, warn};

use super::auth::{Authenticator, Credentials, Session};
use super::scheduler::RenewalScheduler;
use crate::config::PortalConfig;
use crate::error::PortalError;

// State constants for AtomicU8
const STATE_EMPTY: u8 = 0;
const STATE_ACTIVE: u8 = 1;
const STATE_RENEWING: u8 = 2;
const STATE_CLOSED: u8 = 3;

/// Lifecycle state of a [`SessionManager`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Never authenticated
    Empty,
    /// Holding a session
    Active,
    /// A login is in flight
    Renewing,
    /// Shut down; no further renewals
    Closed,
}

/// Owns one account's session and keeps it renewed
pub struct SessionManager {
    authenticator: Authenticator,
    credentials: Credentials,
    refresh_interval: Duration,
    current: ArcSwapOption<Session>,
    renewal_lock: tokio::sync::Mutex<()>,
    state: AtomicU8,
    scheduler: parking_lot::Mutex<Option<RenewalScheduler>>,
}

impl SessionManager {
    /// Create an empty manager
    ///
    /// Nothing is sent to the portal until [`ensure_fresh`](Self::ensure_fresh)
    /// is called.
    pub fn new(config: PortalConfig, credentials: Credentials) -> Self {
        Self {
            refresh_interval: config.refresh_interval,
            authenticator: Authenticator::new(config),
            credentials,
            current: ArcSwapOption::empty(),
            renewal_lock: tokio::sync::Mutex::new(()),
            state: AtomicU8::new(STATE_EMPTY),
            scheduler: parking_lot::Mutex::new(None),
        }
    }

    /// Authenticate and start background renewal
    pub async fn connect(config: PortalConfig, credentials: Credentials) -> Result<Arc<Self>, PortalError> {
        let manager = Arc::new(Self::new(config, credentials));
        manager.ensure_fresh().await?;
        manager.start_renewal();
        Ok(manager)
    }

    /// Start the background renewal task
    ///
    /// No-op if the task is already running or the manager is closed.
    pub fn start_renewal(self: &Arc<Self>) {
        if self.state() == SessionState::Closed {
            return;
        }

        let mut scheduler = self.scheduler.lock();
        if scheduler.as_ref().is_some_and(|s| !s.is_finished()) {
            return;
        }
        *scheduler = Some(RenewalScheduler::spawn(Arc::downgrade(self), self.refresh_interval));
    }

    /// Make sure a session exists and is not about to expire
    ///
    /// Logs in again when there is no session or the current token expires
    /// within one refresh interval. A failed login keeps the previous
    /// session, if any.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::SessionClosed`] after [`shutdown`](Self::shutdown),
    /// otherwise whatever the login failed with.
    pub async fn ensure_fresh(&self) -> Result<(), PortalError> {
        if self.is_closed() {
            return Err(PortalError::SessionClosed);
        }

        let _guard = self.renewal_lock.lock().await;

        let previous = self.current.load_full();
        if let Some(session) = &previous {
            if !session.needs_renewal(Utc::now(), self.refresh_interval) {
                trace!(email = %self.credentials.email(), "Session is still fresh");
                return Ok(());
            }
        }

        let prior = if previous.is_some() { STATE_ACTIVE } else { STATE_EMPTY };
        if !self.transition(prior, STATE_RENEWING) {
            return Err(PortalError::SessionClosed);
        }

        match self.authenticator.authenticate(&self.credentials).await {
            Ok(session) => {
                let expires_at = session.expires_at();
                self.current.store(Some(Arc::new(session)));

                if !self.transition(STATE_RENEWING, STATE_ACTIVE) {
                    return Err(PortalError::SessionClosed);
                }

                info!(
                    email = %self.credentials.email(),
                    expires_at = %expires_at,
                    renewed = previous.is_some(),
                    "Session is fresh"
                );
                Ok(())
            }
            Err(e) => {
                self.transition(STATE_RENEWING, prior);
                warn!(
                    email = %self.credentials.email(),
                    error = %e,
                    "Session login failed"
                );
                Err(e)
            }
        }
    }

    /// Snapshot of the current session
    ///
    /// The returned session stays usable even if a renewal replaces it.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::NoSession`] if no login has succeeded yet.
    pub fn current(&self) -> Result<Arc<Session>, PortalError> {
        self.current.load_full().ok_or(PortalError::NoSession)
    }

    pub fn state(&self) -> SessionState {
        match self.state.load(Ordering::Acquire) {
            STATE_EMPTY => SessionState::Empty,
            STATE_ACTIVE => SessionState::Active,
            STATE_RENEWING => SessionState::Renewing,
            _ => SessionState::Closed,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Stop background renewal and refuse further logins
    ///
    /// Idempotent. The last session stays readable through
    /// [`current`](Self::current).
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Scheduler`] if the renewal task panicked.
    pub async fn shutdown(&self) -> Result<(), PortalError> {
        let was = self.state.swap(STATE_CLOSED, Ordering::AcqRel);

        let scheduler = self.scheduler.lock().take();
        if let Some(scheduler) = scheduler {
            scheduler.shutdown().await?;
        }

        if was != STATE_CLOSED {
            info!(email = %self.credentials.email(), "Session manager shut down");
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.state.load(Ordering::Acquire) == STATE_CLOSED
    }

    /// Move between non-closed states; fails once the manager is closed
    fn transition(&self, from: u8, to: u8) -> bool {
        self.state
            .compare_exchange(from, to, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("credentials", &self.credentials)
            .field("state", &self.state())
            .field("refresh_interval", &self.refresh_interval)
            .finish()
    }
}
