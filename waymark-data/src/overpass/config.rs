//! Configuration for [`super::OverpassClient`].

use std::time::Duration;

/// Public Overpass interpreter endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

/// Default user agent for Overpass requests.
pub const DEFAULT_USER_AGENT: &str = "waymark/0.1 (trail ingestion; +https://github.com/leynos/waymark)";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default minimum spacing between requests, also the backoff base.
const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(3);

/// Default number of attempts per query.
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Configuration for [`super::OverpassClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverpassClientConfig {
    /// Interpreter endpoint URL.
    pub endpoint: String,
    /// Request timeout; also sent to the server as the query timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Minimum interval between requests and the base of the retry backoff.
    pub request_delay: Duration,
    /// Attempts per query before giving up. Values below 1 are treated as 1.
    pub max_attempts: u32,
}

impl Default for OverpassClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            request_delay: DEFAULT_REQUEST_DELAY,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl OverpassClientConfig {
    /// Create a configuration for the given endpoint.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the minimum request interval and backoff base.
    #[must_use]
    pub const fn with_request_delay(mut self, request_delay: Duration) -> Self {
        self.request_delay = request_delay;
        self
    }

    /// Set the number of attempts per query.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Attempts per query, at least one.
    #[must_use]
    pub fn effective_max_attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay before retrying after the zero-based `attempt_index` failed.
    ///
    /// Doubles with every attempt: 3 s, 6 s, 12 s with the defaults.
    #[must_use]
    pub fn backoff_delay(&self, attempt_index: u32) -> Duration {
        let factor = 1_u32.checked_shl(attempt_index).unwrap_or(u32::MAX);
        self.request_delay.saturating_mul(factor)
    }
}
