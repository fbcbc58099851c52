//! Minimum-interval request throttle with an injectable clock.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Source of time for throttling and backoff.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Instant;

    /// Block the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// [`Clock`] backed by [`Instant::now`] and [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Enforces a minimum interval between consecutive requests.
///
/// Share one throttle through [`Arc`] between every client that talks to the
/// same service. The lock is held while waiting, so concurrent callers are
/// admitted one interval apart.
pub struct RequestThrottle {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for RequestThrottle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestThrottle")
            .field("min_interval", &self.min_interval)
            .field("last_request", &self.last_request)
            .field("clock", &"<dyn Clock>")
            .finish()
    }
}

impl RequestThrottle {
    /// Throttle using the system clock.
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self::with_clock(min_interval, Arc::new(SystemClock))
    }

    /// Throttle using the given clock.
    #[must_use]
    pub fn with_clock(min_interval: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
            clock,
        }
    }

    /// Minimum spacing between requests.
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// The clock used for waiting.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Wait until a request may be sent and record it as sent now.
    ///
    /// Returns the instant recorded for this request.
    pub fn acquire(&self) -> Instant {
        let mut last = self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = *last {
            let elapsed = self.clock.now().saturating_duration_since(previous);
            if let Some(remaining) = self.min_interval.checked_sub(elapsed) {
                if !remaining.is_zero() {
                    self.clock.sleep(remaining);
                }
            }
        }
        let admitted = self.clock.now();
        *last = Some(admitted);
        admitted
    }
}
