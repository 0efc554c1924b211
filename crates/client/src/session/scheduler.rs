//! Background session renewal
//!
//! Periodically asks the session manager to renew its token when needed.

use std::sync::Weak;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::manager::SessionManager;
use crate::error::PortalError;

/// Minimum renewal period
const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Handle to a running renewal task
///
/// The task holds only a weak reference to its manager and stops by itself
/// once the manager is dropped.
#[derive(Debug)]
pub struct RenewalScheduler {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl RenewalScheduler {
    /// Spawn the renewal loop
    ///
    /// The first check runs one period after start. Must be called from
    /// within a Tokio runtime.
    pub fn spawn(manager: Weak<SessionManager>, period: Duration) -> Self {
        let period = period.max(MIN_INTERVAL);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(manager, period, cancel.clone()));

        Self { cancel, handle }
    }

    /// Whether the task has exited
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancel the loop and wait for it to exit
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Scheduler`] if the task panicked.
    pub async fn shutdown(mut self) -> Result<(), PortalError> {
        self.cancel.cancel();
        (&mut self.handle)
            .await
            .map_err(|e| PortalError::Scheduler(e.to_string()))
    }
}

impl Drop for RenewalScheduler {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run(manager: Weak<SessionManager>, period: Duration, cancel: CancellationToken) {
    info!(interval = ?period, "Starting session renewal scheduler");

    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Session renewal scheduler cancelled");
                break;
            }
            _ = ticker.tick() => {}
        }

        let Some(manager) = manager.upgrade() else {
            debug!("Session manager dropped, stopping renewal scheduler");
            break;
        };

        debug!("Running scheduled session renewal check");

        match manager.ensure_fresh().await {
            Ok(()) => {}
            Err(PortalError::SessionClosed) => break,
            Err(e) => {
                error!(error = %e, "Scheduled session renewal failed");
            }
        }
    }

    info!("Session renewal scheduler stopped");
}
