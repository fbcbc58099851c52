//! Ingest command implementation for the Waymark CLI.

use std::io::Write;
use std::time::Duration;

use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use waymark_core::geo_query::bounding_box;
use waymark_core::{GeoQuery, MemoryTrailStore, Region, Trail, TrailStore};
use waymark_data::{IngestionPipeline, IngestionRun, OverpassClient, OverpassClientConfig};

use crate::{
    ARG_EAST, ARG_ENDPOINT, ARG_LAT, ARG_LON, ARG_MAX_ATTEMPTS, ARG_NORTH, ARG_RADIUS_KM,
    ARG_REGION, ARG_RELATION, ARG_REQUEST_DELAY_MS, ARG_SOUTH, ARG_TIMEOUT_SECS, ARG_USER_AGENT,
    ARG_WEST, CliError, ENV_EAST, ENV_LAT, ENV_LON, ENV_NORTH, ENV_SOUTH, ENV_WEST,
};

/// Search radius used when `--radius-km` is omitted.
pub(crate) const DEFAULT_RADIUS_KM: f64 = 10.0;

/// CLI arguments for the `ingest` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Ingest hiking routes for exactly one target: a bounding box, \
                 a point and radius, a single relation or a preset region. \
                 Options can come from CLI flags, configuration files, or \
                 environment variables.",
    about = "Ingest hiking routes into the trail store"
)]
#[ortho_config(prefix = "WAYMARK")]
pub(crate) struct IngestArgs {
    /// Southern edge of the bounding box, in degrees.
    #[arg(long = ARG_SOUTH, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) south: Option<f64>,
    /// Western edge of the bounding box, in degrees.
    #[arg(long = ARG_WEST, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) west: Option<f64>,
    /// Northern edge of the bounding box, in degrees.
    #[arg(long = ARG_NORTH, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) north: Option<f64>,
    /// Eastern edge of the bounding box, in degrees.
    #[arg(long = ARG_EAST, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) east: Option<f64>,
    /// Latitude of the search centre.
    #[arg(long = ARG_LAT, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of the search centre.
    #[arg(long = ARG_LON, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lon: Option<f64>,
    /// Search radius around `--lat`/`--lon` (default 10 km).
    #[arg(long = ARG_RADIUS_KM, value_name = "km")]
    #[serde(default)]
    pub(crate) radius_km: Option<f64>,
    /// OpenStreetMap relation id of a single route.
    #[arg(long = ARG_RELATION, value_name = "id")]
    #[serde(default)]
    pub(crate) relation: Option<u64>,
    /// Preset region name (e.g. "bucegi").
    #[arg(long = ARG_REGION, value_name = "name")]
    #[serde(default)]
    pub(crate) region: Option<String>,
    /// Overpass interpreter endpoint.
    #[arg(long = ARG_ENDPOINT, value_name = "url")]
    #[serde(default)]
    pub(crate) endpoint: Option<String>,
    /// User agent sent with Overpass requests.
    #[arg(long = ARG_USER_AGENT, value_name = "agent")]
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
    /// Minimum spacing between Overpass requests, in milliseconds.
    #[arg(long = ARG_REQUEST_DELAY_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) request_delay_ms: Option<u64>,
    /// Attempts per Overpass query.
    #[arg(long = ARG_MAX_ATTEMPTS, value_name = "n")]
    #[serde(default)]
    pub(crate) max_attempts: Option<u32>,
    /// Overpass request timeout, in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl IngestArgs {
    pub(crate) fn into_config(self) -> Result<IngestConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        IngestConfig::try_from(merged)
    }

    fn selected_targets(&self) -> Vec<&'static str> {
        let mut selected = Vec::new();
        if [self.south, self.west, self.north, self.east]
            .iter()
            .any(Option::is_some)
        {
            selected.push(ARG_SOUTH);
        }
        if self.lat.is_some() || self.lon.is_some() || self.radius_km.is_some() {
            selected.push(ARG_LAT);
        }
        if self.relation.is_some() {
            selected.push(ARG_RELATION);
        }
        if self.region.is_some() {
            selected.push(ARG_REGION);
        }
        selected
    }

    fn client_config(&self) -> Result<OverpassClientConfig, CliError> {
        let mut config = OverpassClientConfig::default();
        if let Some(endpoint) = &self.endpoint {
            config = OverpassClientConfig {
                endpoint: endpoint.clone(),
                ..config
            };
        }
        if let Some(user_agent) = &self.user_agent {
            config = config.with_user_agent(user_agent.clone());
        }
        if let Some(millis) = self.request_delay_ms {
            config = config.with_request_delay(Duration::from_millis(millis));
        }
        if let Some(attempts) = self.max_attempts {
            if attempts == 0 {
                return Err(CliError::InvalidArgument {
                    field: ARG_MAX_ATTEMPTS,
                    reason: "must be at least 1".to_owned(),
                });
            }
            config = config.with_max_attempts(attempts);
        }
        if let Some(secs) = self.timeout_secs {
            if secs == 0 {
                return Err(CliError::InvalidArgument {
                    field: ARG_TIMEOUT_SECS,
                    reason: "must be at least 1".to_owned(),
                });
            }
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

/// What to ingest.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Target {
    /// Every route intersecting a bounding box.
    BoundingBox {
        south: f64,
        west: f64,
        north: f64,
        east: f64,
    },
    /// Every route within a radius of a point.
    Nearby { lat: f64, lon: f64, radius_km: f64 },
    /// A single relation.
    Relation(u64),
    /// A preset region.
    Region(Region),
}

/// Resolved `ingest` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct IngestConfig {
    /// The selected target.
    pub(crate) target: Target,
    /// Overpass client settings.
    pub(crate) client: OverpassClientConfig,
}

impl TryFrom<IngestArgs> for IngestConfig {
    type Error = CliError;

    fn try_from(args: IngestArgs) -> Result<Self, Self::Error> {
        let client = args.client_config()?;
        let target = match args.selected_targets().as_slice() {
            [] => return Err(CliError::MissingTarget),
            [first, second, ..] => {
                return Err(CliError::ConflictingTargets {
                    first: *first,
                    second: *second,
                });
            }
            [ARG_SOUTH] => Target::BoundingBox {
                south: latitude(require(args.south, ARG_SOUTH, ENV_SOUTH)?, ARG_SOUTH)?,
                west: longitude(require(args.west, ARG_WEST, ENV_WEST)?, ARG_WEST)?,
                north: latitude(require(args.north, ARG_NORTH, ENV_NORTH)?, ARG_NORTH)?,
                east: longitude(require(args.east, ARG_EAST, ENV_EAST)?, ARG_EAST)?,
            },
            [ARG_LAT] => Target::Nearby {
                lat: latitude(require(args.lat, ARG_LAT, ENV_LAT)?, ARG_LAT)?,
                lon: longitude(require(args.lon, ARG_LON, ENV_LON)?, ARG_LON)?,
                radius_km: radius(args.radius_km.unwrap_or(DEFAULT_RADIUS_KM))?,
            },
            [ARG_RELATION] => Target::Relation(args.relation.unwrap_or_default()),
            [_] => {
                let name = args.region.unwrap_or_default();
                let region = Region::by_name(&name).ok_or_else(|| CliError::UnknownRegion {
                    known: known_regions(),
                    name,
                })?;
                Target::Region(region)
            }
        };
        Ok(Self { target, client })
    }
}

fn require(value: Option<f64>, field: &'static str, env: &'static str) -> Result<f64, CliError> {
    value.ok_or(CliError::MissingArgument { field, env })
}

fn latitude(value: f64, field: &'static str) -> Result<f64, CliError> {
    in_range(value, 90.0, field)
}

fn longitude(value: f64, field: &'static str) -> Result<f64, CliError> {
    in_range(value, 180.0, field)
}

fn in_range(value: f64, limit: f64, field: &'static str) -> Result<f64, CliError> {
    if value.is_finite() && value.abs() <= limit {
        Ok(value)
    } else {
        Err(CliError::InvalidArgument {
            field,
            reason: format!("{value} is outside -{limit}..={limit}"),
        })
    }
}

fn radius(value: f64) -> Result<f64, CliError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CliError::InvalidArgument {
            field: ARG_RADIUS_KM,
            reason: format!("{value} is not a positive distance"),
        })
    }
}

fn known_regions() -> String {
    Region::presets()
        .iter()
        .map(|region| region.name().to_owned())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds the upstream query client for the current ingest invocation.
pub(crate) trait QueryClientBuilder {
    fn build(&self, config: &OverpassClientConfig) -> Result<Box<dyn GeoQuery>, CliError>;
}

pub(crate) struct OverpassClientBuilder;

impl QueryClientBuilder for OverpassClientBuilder {
    fn build(&self, config: &OverpassClientConfig) -> Result<Box<dyn GeoQuery>, CliError> {
        let client = OverpassClient::with_config(config.clone()).map_err(|source| {
            CliError::BuildClient {
                endpoint: config.endpoint.clone(),
                source,
            }
        })?;
        Ok(Box::new(client))
    }
}

/// JSON document printed by the ingest command.
#[derive(Debug, Serialize)]
pub(crate) struct IngestOutput {
    /// Batch report; absent for single-relation ingestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) report: Option<IngestionRun>,
    /// Trails held in the store after the run.
    pub(crate) trails: Vec<TrailReport>,
}

/// A stored trail annotated with what its grade means.
#[derive(Debug, Serialize)]
pub(crate) struct TrailReport {
    #[serde(flatten)]
    pub(crate) trail: Trail,
    pub(crate) difficulty_description: &'static str,
    /// False when the climb or steepest slope exceeds the grade's thresholds.
    pub(crate) within_grade: bool,
}

impl From<Trail> for TrailReport {
    fn from(trail: Trail) -> Self {
        let within_grade = trail
            .difficulty
            .matches(trail.elevation_gain, trail.max_slope);
        Self {
            difficulty_description: trail.difficulty.description(),
            within_grade,
            trail,
        }
    }
}

pub(crate) fn run_ingest(args: IngestArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_ingest_with(args, &OverpassClientBuilder, &mut stdout)
}

pub(crate) fn run_ingest_with(
    args: IngestArgs,
    builder: &dyn QueryClientBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let query = builder.build(&config.client)?;
    let pipeline = IngestionPipeline::new(query, MemoryTrailStore::new());
    let output = execute_ingest(&pipeline, &config.target)?;
    write_output(writer, &output)?;

    match output.report {
        Some(IngestionRun {
            success: false,
            error_message,
            ..
        }) => Err(CliError::RunAborted {
            message: error_message.unwrap_or_default(),
        }),
        _ => Ok(()),
    }
}

fn execute_ingest<Q: GeoQuery>(
    pipeline: &IngestionPipeline<Q, MemoryTrailStore>,
    target: &Target,
) -> Result<IngestOutput, CliError> {
    info!("ingest target: {target:?}");
    let run = match target {
        Target::Relation(external_id) => {
            let trail = pipeline.ingest_by_id(*external_id)?;
            return Ok(IngestOutput {
                report: None,
                trails: vec![TrailReport::from(trail)],
            });
        }
        Target::BoundingBox {
            south,
            west,
            north,
            east,
        } => pipeline.ingest_bounding_box(&bounding_box(*south, *west, *north, *east)),
        Target::Nearby {
            lat,
            lon,
            radius_km,
        } => pipeline.ingest_nearby(*lat, *lon, *radius_km),
        Target::Region(region) => pipeline.ingest_region(region),
    };
    Ok(IngestOutput {
        report: Some(run),
        trails: pipeline
            .store()
            .find_all()?
            .into_iter()
            .map(TrailReport::from)
            .collect(),
    })
}

fn write_output(writer: &mut dyn Write, output: &IngestOutput) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(output).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
