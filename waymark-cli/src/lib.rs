//! Command-line interface for Waymark trail ingestion.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod ingest;
pub mod logging;

pub use error::CliError;

use ingest::{IngestArgs, run_ingest};

pub(crate) const ARG_SOUTH: &str = "south";
pub(crate) const ARG_WEST: &str = "west";
pub(crate) const ARG_NORTH: &str = "north";
pub(crate) const ARG_EAST: &str = "east";
pub(crate) const ARG_LAT: &str = "lat";
pub(crate) const ARG_LON: &str = "lon";
pub(crate) const ARG_RADIUS_KM: &str = "radius-km";
pub(crate) const ARG_RELATION: &str = "relation";
pub(crate) const ARG_REGION: &str = "region";
pub(crate) const ARG_ENDPOINT: &str = "endpoint";
pub(crate) const ARG_USER_AGENT: &str = "user-agent";
pub(crate) const ARG_REQUEST_DELAY_MS: &str = "request-delay-ms";
pub(crate) const ARG_MAX_ATTEMPTS: &str = "max-attempts";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ENV_SOUTH: &str = "WAYMARK_CMDS_INGEST_SOUTH";
pub(crate) const ENV_WEST: &str = "WAYMARK_CMDS_INGEST_WEST";
pub(crate) const ENV_NORTH: &str = "WAYMARK_CMDS_INGEST_NORTH";
pub(crate) const ENV_EAST: &str = "WAYMARK_CMDS_INGEST_EAST";
pub(crate) const ENV_LAT: &str = "WAYMARK_CMDS_INGEST_LAT";
pub(crate) const ENV_LON: &str = "WAYMARK_CMDS_INGEST_LON";

/// Run the Waymark CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Ingest(args) => run_ingest(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "waymark",
    about = "Ingest hiking trails from OpenStreetMap via the Overpass API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch, normalise and store hiking routes for one target.
    Ingest(IngestArgs),
}

#[cfg(test)]
mod tests;
