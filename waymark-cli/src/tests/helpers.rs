//! Test helpers for driving the ingest command without network access.

use super::*;
use crate::ingest::QueryClientBuilder;
use std::cell::RefCell;
use waymark_core::test_support::StubGeoQuery;
use waymark_core::{Coordinate, GeoQuery, PathFragment, RawRoute};
use waymark_data::OverpassClientConfig;

/// [`QueryClientBuilder`] handing out a fixed stub and recording the
/// configuration it was asked to build from.
#[derive(Debug)]
pub(super) struct StubClientBuilder {
    query: StubGeoQuery,
    seen: RefCell<Option<OverpassClientConfig>>,
}

impl StubClientBuilder {
    pub(super) fn new(query: StubGeoQuery) -> Self {
        Self {
            query,
            seen: RefCell::new(None),
        }
    }

    pub(super) fn seen(&self) -> Option<OverpassClientConfig> {
        self.seen.borrow().clone()
    }
}

impl QueryClientBuilder for StubClientBuilder {
    fn build(&self, config: &OverpassClientConfig) -> Result<Box<dyn GeoQuery>, CliError> {
        self.seen.replace(Some(config.clone()));
        Ok(Box::new(self.query.clone()))
    }
}

/// A short, valid route named after the Bucegi Mountains.
pub(super) fn bucegi_route(external_id: u64) -> RawRoute {
    RawRoute::new(external_id)
        .with_name("Bucegi: Busteni - Cabana Omu")
        .with_marking_symbol("red:white:red_triangle")
        .with_fragment(PathFragment::new(
            external_id + 1,
            vec![
                Coordinate::with_elevation(25.4600, 45.4000, 1800.0),
                Coordinate::with_elevation(25.4620, 45.4015, 1860.0),
                Coordinate::with_elevation(25.4640, 45.4030, 1910.0),
            ],
        ))
}

/// Parse a full command line into ingest arguments.
pub(super) fn parse_ingest(extra: &[&str]) -> Result<crate::ingest::IngestArgs, CliError> {
    let mut argv = vec!["waymark", "ingest"];
    argv.extend_from_slice(extra);
    let cli = Cli::try_parse_from(argv).map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Ingest(args) => Ok(args),
    }
}
