//! Portal connection settings.

use std::time::Duration;

use url::Url;

use crate::error::PortalError;

/// Production portal
pub const DEFAULT_BASE_URL: &str = "https://cm.harica.gr";

/// How often the session is checked for renewal, and how far ahead of expiry
/// a token is considered due (15 minutes)
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Transport-level timeout for a single HTTP exchange
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Settings shared by every session talking to one portal
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Portal root; endpoint paths are joined onto it
    pub base_url: Url,
    /// Renewal period and look-ahead window
    pub refresh_interval: Duration,
    /// Per-request timeout applied by the transport
    pub request_timeout: Duration,
    /// Log every request path and response body at debug level
    pub debug: bool,
}

impl PortalConfig {
    /// Create a configuration for the portal at `base_url`
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidUrl`] if `base_url` does not parse.
    pub fn new(base_url: &str) -> Result<Self, PortalError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            ..Self::default()
        })
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Resolve an absolute endpoint path (`/api/...`) against the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url, PortalError> {
        Ok(self.base_url.join(path)?)
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default portal URL is valid"),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            debug: false,
        }
    }
}
