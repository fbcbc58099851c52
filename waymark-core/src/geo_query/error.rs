use thiserror::Error;

/// A single failed exchange with the upstream geodata service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum UpstreamFailure {
    /// The service answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        /// Endpoint that was queried.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error detail.
        message: String,
    },
    /// The request did not complete at the network level.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Endpoint that was queried.
        url: String,
        /// Error detail.
        message: String,
    },
    /// The request exceeded its deadline.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Endpoint that was queried.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The response body could not be decoded.
    #[error("malformed response: {message}")]
    Malformed {
        /// Decoder error detail.
        message: String,
    },
    /// The service reported a query error in its `remark` field.
    #[error("service rejected the query: {remark}")]
    Remark {
        /// Remark text returned by the service.
        remark: String,
    },
}

impl UpstreamFailure {
    /// Whether repeating the request may succeed.
    ///
    /// Remarks describe a problem with the query itself and are final.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::Remark { .. })
    }
}

/// Errors from [`crate::GeoQuery`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GeoQueryError {
    /// Every permitted attempt failed, or a non-retryable failure occurred.
    #[error("upstream geodata service unavailable after {attempts} attempt(s)")]
    UpstreamUnavailable {
        /// Attempts made before giving up.
        attempts: u32,
        /// The last failure observed.
        #[source]
        cause: UpstreamFailure,
    },
}

impl GeoQueryError {
    /// The last underlying failure.
    #[must_use]
    pub const fn cause(&self) -> &UpstreamFailure {
        match self {
            Self::UpstreamUnavailable { cause, .. } => cause,
        }
    }
}
