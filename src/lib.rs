//! Facade crate for the Waymark trail ingestion engine.
//!
//! This crate re-exports the core domain types and exposes the Overpass
//! client and ingestion pipeline behind the `overpass` feature.

#![forbid(unsafe_code)]

pub use waymark_core::{
    Coordinate, Difficulty, FragmentAssembler, GeoQuery, GeoQueryError, HazardRule,
    MarkingColor, MarkingShape, MemoryTrailStore, NormalisationError, PathFragment, RawRoute,
    Region, RouteNormaliser, StoreError, Trail, TrailId, TrailMarking, TrailMetrics,
    TrailSegment, TrailStore, UpstreamFailure, ValidationError, Waypoint, WaypointKind,
    validate_trail,
};

#[cfg(feature = "overpass")]
pub use waymark_data::{
    ClientBuildError, FailureStage, IngestError, IngestionFailure, IngestionPipeline,
    IngestionRun, OverpassClient, OverpassClientConfig, RequestThrottle,
};
