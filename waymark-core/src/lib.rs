//! Core domain types for the Waymark trail ingestion engine.
//!
//! Responsibilities:
//! - Model raw routes, fragments and normalised trails.
//! - Stitch fragments into continuous geometry and derive trail metrics.
//! - Classify difficulty, terrain, hazards and markings.
//! - Define the [`GeoQuery`] and [`TrailStore`] boundaries.
//!
//! Network access lives in `waymark-data`; this crate performs no I/O.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod assemble;
pub mod difficulty;
pub mod geo_query;
pub mod marking;
pub mod metrics;
pub mod normalise;
pub mod route;
pub mod store;
pub mod trail;
pub mod validate;
pub mod waypoint;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use assemble::{DEFAULT_JOIN_TOLERANCE, FragmentAssembler};
pub use difficulty::Difficulty;
pub use geo_query::{GeoQuery, GeoQueryError, Region, UpstreamFailure};
pub use marking::{MarkingColor, MarkingShape, TrailMarking};
pub use metrics::TrailMetrics;
pub use normalise::{
    HazardRule, NormalisationError, OPENSTREETMAP_SOURCE, RouteNormaliser, UNNAMED_TRAIL,
};
pub use route::{Coordinate, PathFragment, RawRoute};
pub use store::{MemoryTrailStore, StoreError, TrailStore};
pub use trail::{Trail, TrailId, TrailSegment};
pub use validate::{ValidationError, validate_trail};
pub use waypoint::{Waypoint, WaypointKind};
