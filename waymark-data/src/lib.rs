//! Upstream access and ingestion orchestration for Waymark.
//!
//! Responsibilities:
//! - Query the Overpass API for hiking route relations, with throttling and
//!   retries.
//! - Drive raw routes through normalisation, deduplication, validation and
//!   upsert into a [`waymark_core::TrailStore`].
//!
//! Boundaries:
//! - Do not encode domain rules (live in `waymark-core`).
//! - Keep blocking I/O off async executors; the HTTP transport bridges to
//!   its own runtime or uses `block_in_place`.
//!
//! Invariants:
//! - Every upstream request passes through a [`overpass::RequestThrottle`].
//! - Only a failed fetch aborts a batch; per-route failures are reported.
//! - No global mutable state.

pub mod ingest;
pub mod overpass;

pub use ingest::{
    FailureStage, IngestError, IngestionFailure, IngestionPipeline, IngestionRun, UpsertOutcome,
};
pub use overpass::{
    ClientBuildError, OverpassClient, OverpassClientConfig, QueryTransport, RequestThrottle,
};
