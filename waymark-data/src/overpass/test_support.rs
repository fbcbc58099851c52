//! Test doubles for the Overpass client.
//!
//! These are intended for use in unit and integration tests only.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use waymark_core::UpstreamFailure;

use super::throttle::Clock;
use super::transport::QueryTransport;

/// Scripted [`QueryTransport`].
///
/// Responses are consumed in order; once the script runs out the final
/// response repeats. Every query text is recorded.
#[derive(Debug)]
pub struct StubTransport {
    script: Mutex<VecDeque<Result<String, UpstreamFailure>>>,
    last: Mutex<Option<Result<String, UpstreamFailure>>>,
    queries: Mutex<Vec<String>>,
}

impl StubTransport {
    /// Answer with `responses` in order, repeating the last one.
    #[must_use]
    pub fn scripted(responses: Vec<Result<String, UpstreamFailure>>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            last: Mutex::new(None),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Answer every query with `body`.
    #[must_use]
    pub fn always_ok(body: &str) -> Self {
        Self::scripted(vec![Ok(body.to_owned())])
    }

    /// Fail every query with `failure`.
    #[must_use]
    pub fn always_err(failure: UpstreamFailure) -> Self {
        Self::scripted(vec![Err(failure)])
    }

    /// Number of queries executed.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Query texts in execution order.
    #[must_use]
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl QueryTransport for StubTransport {
    fn execute(&self, query: &str) -> Result<String, UpstreamFailure> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.to_owned());
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(next) = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
        {
            *last = Some(next);
        }
        last.clone().unwrap_or_else(|| {
            Err(UpstreamFailure::Malformed {
                message: "stub transport has no scripted response".to_owned(),
            })
        })
    }
}

/// [`Clock`] that only moves when told to, recording every sleep.
///
/// Sleeping advances the clock by the requested duration and returns at
/// once.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Mutex<Duration>,
    sleeps: Mutex<Vec<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    /// A clock starting at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    /// Move time forward without recording a sleep.
    pub fn advance(&self, by: Duration) {
        let mut elapsed = self.elapsed.lock().unwrap_or_else(PoisonError::into_inner);
        *elapsed = elapsed.saturating_add(by);
    }

    /// Every sleep requested so far.
    #[must_use]
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let elapsed = *self.elapsed.lock().unwrap_or_else(PoisonError::into_inner);
        self.origin + elapsed
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(duration);
        self.advance(duration);
    }
}
