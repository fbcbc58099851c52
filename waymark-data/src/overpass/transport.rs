//! HTTP transport for Overpass queries.
//!
//! [`HttpTransport`] posts query text to the interpreter endpoint with
//! `reqwest` and blocks on the response so the synchronous
//! [`waymark_core::GeoQuery`] contract can be met.

use std::sync::Arc;

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::form_urlencoded;
use waymark_core::UpstreamFailure;

use super::OverpassClientConfig;

/// Error building an HTTP-backed client.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// A single request/response exchange with the query service.
///
/// Implementations perform exactly one attempt and report its failure;
/// throttling and retries belong to [`super::OverpassClient`].
pub trait QueryTransport: Send + Sync {
    /// Send `query` and return the raw response body.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamFailure`] for network failures, timeouts and
    /// non-success HTTP statuses.
    fn execute(&self, query: &str) -> Result<String, UpstreamFailure>;
}

impl<T: QueryTransport + ?Sized> QueryTransport for Arc<T> {
    fn execute(&self, query: &str) -> Result<String, UpstreamFailure> {
        (**self).execute(query)
    }
}

/// Encode query text as an `application/x-www-form-urlencoded` body.
#[must_use]
pub fn form_body(query: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("data={encoded}")
}

/// `reqwest`-backed [`QueryTransport`].
///
/// # Runtime behaviour
///
/// When called from within a multi-threaded Tokio runtime (detected via
/// [`Handle::try_current()`] and [`RuntimeFlavor::MultiThread`]), the
/// transport blocks on that runtime's handle inside
/// [`tokio::task::block_in_place`]. Otherwise it drives the request on its
/// own current-thread runtime.
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    timeout_secs: u64,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("client", &self.client)
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpTransport {
    /// Build a transport from client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(config: &OverpassClientConfig) -> Result<Self, ClientBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ClientBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClientBuildError::Runtime)?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            timeout_secs: config.timeout.as_secs(),
            runtime,
        })
    }

    /// Endpoint queries are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, query: &str) -> Result<String, UpstreamFailure> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(form_body(query))
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err))?;

        response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err))
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error) -> UpstreamFailure {
        if error.is_timeout() {
            return UpstreamFailure::Timeout {
                url: self.endpoint.clone(),
                timeout_secs: self.timeout_secs,
            };
        }

        if let Some(status) = error.status() {
            return UpstreamFailure::Http {
                url: self.endpoint.clone(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        UpstreamFailure::Network {
            url: self.endpoint.clone(),
            message: error.to_string(),
        }
    }
}

impl QueryTransport for HttpTransport {
    fn execute(&self, query: &str) -> Result<String, UpstreamFailure> {
        let future = self.post(query);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            // No runtime detected, or current_thread runtime: use our own runtime.
            _ => self.runtime.block_on(future),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::time::Duration;

    #[rstest]
    fn form_body_percent_encodes_query() {
        assert_eq!(
            form_body("relation(1);out geom;"),
            "data=relation%281%29%3Bout+geom%3B"
        );
    }

    #[rstest]
    fn transport_builds_from_config() {
        let config = OverpassClientConfig::new("http://127.0.0.1:1/api/interpreter")
            .with_timeout(Duration::from_secs(2));
        let transport = HttpTransport::new(&config).expect("transport should build");
        assert_eq!(transport.endpoint(), "http://127.0.0.1:1/api/interpreter");
        assert!(format!("{transport:?}").contains("<tokio::runtime::Runtime>"));
    }

    #[rstest]
    fn unreachable_endpoint_is_a_transport_failure() {
        let config = OverpassClientConfig::new("http://127.0.0.1:1/api/interpreter")
            .with_timeout(Duration::from_secs(2));
        let transport = HttpTransport::new(&config).expect("transport should build");
        let failure = transport
            .execute("relation(1);out geom;")
            .expect_err("nothing listens on port 1");
        assert!(
            matches!(
                failure,
                UpstreamFailure::Network { .. } | UpstreamFailure::Timeout { .. }
            ),
            "unexpected failure {failure:?}"
        );
        assert!(failure.is_retryable());
    }
}
