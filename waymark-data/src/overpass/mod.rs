//! Overpass API adapter.
//!
//! [`OverpassClient`] implements [`waymark_core::GeoQuery`] on top of a
//! [`QueryTransport`]. The default transport posts Overpass QL over HTTP;
//! tests substitute [`test_support::StubTransport`] and
//! [`test_support::ManualClock`].
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use waymark_core::{GeoQuery, Region};
//! use waymark_data::overpass::{OverpassClient, OverpassClientConfig};
//!
//! let config = OverpassClientConfig::default().with_timeout(Duration::from_secs(90));
//! let client = OverpassClient::with_config(config)?;
//! let routes = client.query_region(&Region::bucegi())?;
//! println!("{} routes", routes.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod client;
mod config;
mod query;
mod response;
mod throttle;
mod transport;

#[doc(hidden)]
pub mod test_support;

pub use client::OverpassClient;
pub use config::{DEFAULT_ENDPOINT, DEFAULT_USER_AGENT, OverpassClientConfig};
pub use query::{bounding_box_query, relation_query};
pub use response::{Element, GeometryPoint, Member, OverpassResponse, RelationElement, WayElement};
pub use throttle::{Clock, RequestThrottle, SystemClock};
pub use transport::{ClientBuildError, HttpTransport, QueryTransport, form_body};
