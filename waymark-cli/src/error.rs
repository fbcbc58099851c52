//! Error types emitted by the Waymark CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>`.

use std::sync::Arc;

use thiserror::Error;
use waymark_core::StoreError;
use waymark_data::{ClientBuildError, IngestError};

/// Errors emitted by the Waymark CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// No ingestion target was selected.
    #[error(
        "no ingestion target: pass --region, --relation, --lat/--lon or \
         --south/--west/--north/--east"
    )]
    MissingTarget,
    /// More than one ingestion target was selected.
    #[error("--{first} and --{second} select different targets; choose one")]
    ConflictingTargets {
        first: &'static str,
        second: &'static str,
    },
    /// An option value is out of range.
    #[error("invalid --{field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },
    /// The region name matches no preset.
    #[error("unknown region {name:?} (known: {known})")]
    UnknownRegion { name: String, known: String },
    /// Constructing the Overpass client failed.
    #[error("failed to build Overpass client for {endpoint:?}: {source}")]
    BuildClient {
        endpoint: String,
        #[source]
        source: ClientBuildError,
    },
    /// Single-route ingestion failed.
    #[error("failed to ingest route: {0}")]
    Ingest(#[from] IngestError),
    /// A batch run aborted before processing any routes.
    #[error("ingestion aborted: {message}")]
    RunAborted { message: String },
    /// Reading back the ingested trails failed.
    #[error("failed to read ingested trails: {0}")]
    Store(#[from] StoreError),
    /// Serialising the ingestion output failed.
    #[error("failed to serialise ingestion output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing the ingestion output failed.
    #[error("failed to write ingestion output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
