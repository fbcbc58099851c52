//! Throttled, retrying Overpass client.

use std::sync::Arc;

use geo::Rect;
use log::{debug, warn};
use waymark_core::{GeoQuery, GeoQueryError, RawRoute, UpstreamFailure};

use super::query::{bounding_box_query, relation_query};
use super::response::OverpassResponse;
use super::throttle::RequestThrottle;
use super::transport::{ClientBuildError, HttpTransport, QueryTransport};
use super::OverpassClientConfig;

/// [`GeoQuery`] implementation backed by an Overpass interpreter.
///
/// Every attempt first passes through the shared [`RequestThrottle`]. Failed
/// attempts are retried with a doubling delay until
/// [`OverpassClientConfig::max_attempts`] is reached; a `remark` in the
/// response ends the query at once.
#[derive(Debug)]
pub struct OverpassClient<T = HttpTransport> {
    transport: T,
    config: OverpassClientConfig,
    throttle: Arc<RequestThrottle>,
}

impl OverpassClient<HttpTransport> {
    /// Create an HTTP client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new() -> Result<Self, ClientBuildError> {
        Self::with_config(OverpassClientConfig::default())
    }

    /// Create an HTTP client with explicit configuration and its own
    /// throttle.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: OverpassClientConfig) -> Result<Self, ClientBuildError> {
        let throttle = Arc::new(RequestThrottle::new(config.request_delay));
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(transport, config, throttle))
    }
}

impl<T: QueryTransport> OverpassClient<T> {
    /// Create a client over any transport, sharing `throttle`.
    #[must_use]
    pub fn with_transport(
        transport: T,
        config: OverpassClientConfig,
        throttle: Arc<RequestThrottle>,
    ) -> Self {
        Self {
            transport,
            config,
            throttle,
        }
    }

    /// Client configuration.
    #[must_use]
    pub const fn config(&self) -> &OverpassClientConfig {
        &self.config
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// The throttle shared by this client.
    #[must_use]
    pub fn throttle(&self) -> &Arc<RequestThrottle> {
        &self.throttle
    }

    /// Run `query` with throttling and retries.
    ///
    /// # Errors
    ///
    /// Returns [`GeoQueryError::UpstreamUnavailable`] once every attempt has
    /// failed, or straight away when the service answers with a remark.
    pub fn fetch(&self, query: &str) -> Result<OverpassResponse, GeoQueryError> {
        let max_attempts = self.config.effective_max_attempts();
        let mut attempts = 0;
        loop {
            self.throttle.acquire();
            attempts += 1;
            let cause = match self.attempt(query) {
                Ok(response) => return Ok(response),
                Err(cause) => cause,
            };

            if !cause.is_retryable() || attempts >= max_attempts {
                warn!("giving up on Overpass query after {attempts} attempt(s): {cause}");
                return Err(GeoQueryError::UpstreamUnavailable { attempts, cause });
            }

            let delay = self.config.backoff_delay(attempts - 1);
            warn!(
                "Overpass attempt {attempts}/{max_attempts} failed: {cause}; retrying in {delay:?}"
            );
            self.throttle.clock().sleep(delay);
        }
    }

    fn attempt(&self, query: &str) -> Result<OverpassResponse, UpstreamFailure> {
        let body = self.transport.execute(query)?;
        let response: OverpassResponse =
            serde_json::from_str(&body).map_err(|err| UpstreamFailure::Malformed {
                message: err.to_string(),
            })?;
        match response.remark {
            Some(remark) => Err(UpstreamFailure::Remark { remark }),
            None => Ok(response),
        }
    }

    fn timeout_secs(&self) -> u64 {
        self.config.timeout.as_secs()
    }
}

impl<T: QueryTransport> GeoQuery for OverpassClient<T> {
    fn query_by_bounding_box(&self, bbox: &Rect<f64>) -> Result<Vec<RawRoute>, GeoQueryError> {
        let routes = self
            .fetch(&bounding_box_query(bbox, self.timeout_secs()))?
            .into_routes();
        debug!("Overpass returned {} route relation(s)", routes.len());
        Ok(routes)
    }

    fn query_by_id(&self, external_id: u64) -> Result<Option<RawRoute>, GeoQueryError> {
        let routes = self
            .fetch(&relation_query(external_id, self.timeout_secs()))?
            .into_routes();
        Ok(routes
            .into_iter()
            .find(|route| route.external_id == external_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overpass::test_support::{ManualClock, StubTransport};
    use rstest::{fixture, rstest};
    use std::time::Duration;
    use waymark_core::geo_query::bounding_box;

    const ONE_ROUTE: &str = r#"{"elements": [
        {"type": "relation", "id": 42, "tags": {"name": "Ridge"}, "members": [
            {"type": "way", "ref": 1, "role": "",
             "geometry": [{"lat": 45.0, "lon": 25.0}, {"lat": 45.01, "lon": 25.01}]}
        ]}
    ]}"#;

    #[fixture]
    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new())
    }

    fn client(transport: StubTransport, clock: &Arc<ManualClock>) -> OverpassClient<StubTransport> {
        let config = OverpassClientConfig::default();
        let throttle = Arc::new(RequestThrottle::with_clock(
            config.request_delay,
            clock.clone(),
        ));
        OverpassClient::with_transport(transport, config, throttle)
    }

    fn network_failure() -> UpstreamFailure {
        UpstreamFailure::Network {
            url: "http://overpass.invalid".to_owned(),
            message: "connection reset".to_owned(),
        }
    }

    #[rstest]
    fn bounding_box_query_parses_routes(clock: Arc<ManualClock>) {
        let client = client(StubTransport::always_ok(ONE_ROUTE), &clock);
        let routes = client
            .query_by_bounding_box(&bounding_box(45.0, 25.0, 45.1, 25.1))
            .expect("query should succeed");

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].name.as_deref(), Some("Ridge"));
        let queries = client.transport().queries();
        assert!(queries[0].contains("[bbox:45.000000,25.000000,45.100000,25.100000]"));
    }

    #[rstest]
    fn query_by_id_returns_none_when_absent(clock: Arc<ManualClock>) {
        let client = client(StubTransport::always_ok(ONE_ROUTE), &clock);
        assert!(client.query_by_id(7).expect("query should succeed").is_none());
        assert!(client.query_by_id(42).expect("query should succeed").is_some());
    }

    #[rstest]
    fn recovers_after_transient_failure(clock: Arc<ManualClock>) {
        let transport = StubTransport::scripted(vec![
            Err(network_failure()),
            Ok(ONE_ROUTE.to_owned()),
        ]);
        let client = client(transport, &clock);
        let routes = client
            .query_nearby(45.0, 25.0, 5.0)
            .expect("second attempt should succeed");

        assert_eq!(routes.len(), 1);
        assert_eq!(client.transport().calls(), 2);
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(3)]);
    }

    #[rstest]
    fn exhausts_attempts_with_doubling_backoff(clock: Arc<ManualClock>) {
        let client = client(StubTransport::always_err(network_failure()), &clock);
        let err = client
            .query_by_id(1)
            .expect_err("every attempt fails");

        assert_eq!(client.transport().calls(), 3);
        assert!(matches!(
            err,
            GeoQueryError::UpstreamUnavailable { attempts: 3, .. }
        ));
        assert_eq!(err.cause(), &network_failure());
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_secs(3), Duration::from_secs(6)]
        );
    }

    #[rstest]
    fn remark_fails_without_retry(clock: Arc<ManualClock>) {
        let body = r#"{"elements": [], "remark": "runtime error: out of memory"}"#;
        let client = client(StubTransport::always_ok(body), &clock);
        let err = client.query_by_id(1).expect_err("remark is fatal");

        assert_eq!(client.transport().calls(), 1);
        assert!(matches!(
            err,
            GeoQueryError::UpstreamUnavailable {
                attempts: 1,
                cause: UpstreamFailure::Remark { .. }
            }
        ));
        assert!(clock.sleeps().is_empty());
    }

    #[rstest]
    fn malformed_body_is_retried(clock: Arc<ManualClock>) {
        let transport = StubTransport::scripted(vec![
            Ok("<html>busy</html>".to_owned()),
            Ok(ONE_ROUTE.to_owned()),
        ]);
        let client = client(transport, &clock);
        assert!(client.query_by_id(42).expect("retry succeeds").is_some());
        assert_eq!(client.transport().calls(), 2);
    }

    #[rstest]
    fn clients_sharing_a_throttle_are_spaced(clock: Arc<ManualClock>) {
        let config = OverpassClientConfig::default();
        let throttle = Arc::new(RequestThrottle::with_clock(
            config.request_delay,
            clock.clone(),
        ));
        let first = OverpassClient::with_transport(
            StubTransport::always_ok(ONE_ROUTE),
            config.clone(),
            Arc::clone(&throttle),
        );
        let second = OverpassClient::with_transport(
            StubTransport::always_ok(ONE_ROUTE),
            config,
            throttle,
        );

        first.query_by_id(42).expect("query should succeed");
        clock.advance(Duration::from_secs(1));
        second.query_by_id(42).expect("query should succeed");

        assert_eq!(clock.sleeps(), vec![Duration::from_secs(2)]);
    }
}
