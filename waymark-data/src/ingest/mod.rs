//! Batch and single-trail ingestion.
//!
//! [`IngestionPipeline`] drives fetch → normalise → deduplicate → validate →
//! upsert. Per-route failures are absorbed into the [`IngestionRun`] report;
//! only a failed fetch aborts a batch.

mod report;

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use geo::Rect;
use log::{info, warn};
use thiserror::Error;
use waymark_core::{
    GeoQuery, GeoQueryError, NormalisationError, RawRoute, Region, RouteNormaliser, StoreError,
    Trail, TrailStore, ValidationError, validate_trail,
};

pub use report::{FailureStage, IngestionFailure, IngestionRun};

/// Errors from [`IngestionPipeline::ingest_by_id`].
#[derive(Debug, Error)]
pub enum IngestError {
    /// The upstream query failed.
    #[error(transparent)]
    Upstream(#[from] GeoQueryError),
    /// The upstream service has no such route.
    #[error("route {external_id} not found upstream")]
    NotFound {
        /// Requested upstream id.
        external_id: u64,
    },
    /// The route could not be normalised.
    #[error(transparent)]
    Normalisation(#[from] NormalisationError),
    /// The normalised trail failed validation.
    #[error("trail {external_id} failed validation: {source}")]
    Validation {
        /// Upstream id of the rejected trail.
        external_id: u64,
        /// Validation failure.
        #[source]
        source: ValidationError,
    },
    /// The store rejected the lookup or save.
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

/// Whether an upsert created or updated a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No record with the external id existed.
    Created,
    /// An existing record was refreshed.
    Updated,
}

/// Orchestrates ingestion from a [`GeoQuery`] into a [`TrailStore`].
///
/// # Examples
/// ```
/// use waymark_core::test_support::{RecordingStore, StubGeoQuery};
/// use waymark_core::{Coordinate, PathFragment, RawRoute, TrailStore};
/// use waymark_data::ingest::IngestionPipeline;
///
/// let route = RawRoute::new(7).with_name("Ridge").with_fragment(PathFragment::new(
///     1,
///     vec![Coordinate::new(25.50, 45.40), Coordinate::new(25.51, 45.41)],
/// ));
/// let pipeline = IngestionPipeline::new(StubGeoQuery::with_routes(vec![route]), RecordingStore::new());
///
/// let run = pipeline.ingest_nearby(45.4, 25.5, 5.0);
/// assert!(run.success);
/// assert_eq!(run.created, 1);
/// assert_eq!(pipeline.store().find_all()?.len(), 1);
/// # Ok::<(), waymark_core::StoreError>(())
/// ```
#[derive(Debug)]
pub struct IngestionPipeline<Q, S> {
    query: Q,
    store: S,
    normaliser: RouteNormaliser,
}

impl<Q: GeoQuery, S: TrailStore> IngestionPipeline<Q, S> {
    /// Create a pipeline with the default normaliser.
    #[must_use]
    pub fn new(query: Q, store: S) -> Self {
        Self {
            query,
            store,
            normaliser: RouteNormaliser::default(),
        }
    }

    /// Use a custom normaliser.
    #[must_use]
    pub fn with_normaliser(mut self, normaliser: RouteNormaliser) -> Self {
        self.normaliser = normaliser;
        self
    }

    /// The query client.
    #[must_use]
    pub const fn query(&self) -> &Q {
        &self.query
    }

    /// The trail store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Run a batch whose raw routes come from `fetch`.
    ///
    /// A fetch failure aborts the run with `success == false`; every later
    /// failure drops only the affected route.
    pub fn run<F>(&self, fetch: F) -> IngestionRun
    where
        F: FnOnce(&Q) -> Result<Vec<RawRoute>, GeoQueryError>,
    {
        self.run_with(&self.normaliser, fetch)
    }

    /// Ingest every route intersecting `bbox`.
    pub fn ingest_bounding_box(&self, bbox: &Rect<f64>) -> IngestionRun {
        self.run(|query| query.query_by_bounding_box(bbox))
    }

    /// Ingest every route within `radius_km` of a point.
    pub fn ingest_nearby(&self, lat: f64, lon: f64, radius_km: f64) -> IngestionRun {
        self.run(|query| query.query_nearby(lat, lon, radius_km))
    }

    /// Ingest a preset region, applying its hazard rule as well.
    pub fn ingest_region(&self, region: &Region) -> IngestionRun {
        info!("ingesting region {}", region.name());
        let normaliser = self.normaliser_for(region);
        self.run_with(&normaliser, |query| query.query_region(region))
    }

    /// Fetch, normalise, validate and upsert a single route.
    ///
    /// # Errors
    ///
    /// Propagates the first failure of any stage; see [`IngestError`].
    pub fn ingest_by_id(&self, external_id: u64) -> Result<Trail, IngestError> {
        let route = self
            .query
            .query_by_id(external_id)?
            .ok_or(IngestError::NotFound { external_id })?;
        let trail = self.normaliser.normalise(&route)?;
        validate_trail(&trail).map_err(|source| IngestError::Validation {
            external_id,
            source,
        })?;
        let (saved, outcome) = self.upsert(trail)?;
        info!("ingested route {external_id} ({outcome:?})");
        Ok(saved)
    }

    /// Save `trail`, merging it into the existing record with the same
    /// external id when there is one.
    ///
    /// # Errors
    ///
    /// Returns the store's error from the lookup or the save.
    pub fn upsert(&self, trail: Trail) -> Result<(Trail, UpsertOutcome), StoreError> {
        let existing = match trail.external_id {
            Some(external_id) => self.store.find_by_external_id(external_id)?,
            None => None,
        };
        match existing {
            Some(mut record) => {
                record.merge_from(trail);
                Ok((self.store.save(record)?, UpsertOutcome::Updated))
            }
            None => Ok((self.store.save(trail)?, UpsertOutcome::Created)),
        }
    }

    fn normaliser_for(&self, region: &Region) -> RouteNormaliser {
        match region.hazard_rule() {
            Some(rule) if !self.normaliser.hazard_rules().contains(rule) => {
                self.normaliser.clone().with_hazard_rule(rule.clone())
            }
            _ => self.normaliser.clone(),
        }
    }

    fn run_with<F>(&self, normaliser: &RouteNormaliser, fetch: F) -> IngestionRun
    where
        F: FnOnce(&Q) -> Result<Vec<RawRoute>, GeoQueryError>,
    {
        let routes = match fetch(&self.query) {
            Ok(routes) => routes,
            Err(err) => {
                let message = format!("{err}: {}", err.cause());
                warn!("ingestion aborted: {message}");
                return IngestionRun::aborted(message);
            }
        };

        let mut run = IngestionRun {
            fetched: routes.len(),
            ..IngestionRun::default()
        };
        info!("fetched {} route(s)", run.fetched);

        let trails = normalise_all(normaliser, &routes, &mut run);
        run.normalised = trails.len();

        let unique = deduplicate(trails);
        run.deduplicated = unique.len();

        let valid = validate_all(unique, &mut run);
        run.validated = valid.len();

        for trail in valid {
            let external_id = trail.external_id;
            match self.upsert(trail) {
                Ok((_, UpsertOutcome::Created)) => run.created += 1,
                Ok((_, UpsertOutcome::Updated)) => run.updated += 1,
                Err(err) => {
                    warn!("failed to persist trail {external_id:?}: {err}");
                    run.record_failure(external_id, FailureStage::Persistence, err.to_string());
                }
            }
        }

        run.success = true;
        info!(
            "ingestion finished: {} created, {} updated, {} failed",
            run.created, run.updated, run.failed
        );
        run
    }
}

impl<Q, S> IngestionPipeline<Q, S>
where
    Q: GeoQuery + Send + Sync + 'static,
    S: TrailStore + Send + Sync + 'static,
{
    /// Run a batch on a background thread.
    ///
    /// Dropping the handle detaches the run.
    pub fn spawn<F>(self: &Arc<Self>, fetch: F) -> JoinHandle<IngestionRun>
    where
        F: FnOnce(&Q) -> Result<Vec<RawRoute>, GeoQueryError> + Send + 'static,
    {
        let pipeline = Arc::clone(self);
        thread::spawn(move || pipeline.run(fetch))
    }
}

fn normalise_all(
    normaliser: &RouteNormaliser,
    routes: &[RawRoute],
    run: &mut IngestionRun,
) -> Vec<Trail> {
    routes
        .iter()
        .filter_map(|route| match normaliser.normalise(route) {
            Ok(trail) => Some(trail),
            Err(err) => {
                warn!("skipping route {}: {err}", route.external_id);
                run.record_failure(
                    Some(route.external_id),
                    FailureStage::Normalisation,
                    err.to_string(),
                );
                None
            }
        })
        .collect()
}

/// Keep one trail per external id: the last one seen, at the position where
/// the id first appeared.
fn deduplicate(trails: Vec<Trail>) -> Vec<Trail> {
    let mut positions: HashMap<u64, usize> = HashMap::new();
    let mut unique: Vec<Trail> = Vec::with_capacity(trails.len());
    for trail in trails {
        let Some(external_id) = trail.external_id else {
            unique.push(trail);
            continue;
        };
        match positions.entry(external_id) {
            Entry::Occupied(slot) => {
                if let Some(kept) = unique.get_mut(*slot.get()) {
                    *kept = trail;
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(unique.len());
                unique.push(trail);
            }
        }
    }
    unique
}

fn validate_all(trails: Vec<Trail>, run: &mut IngestionRun) -> Vec<Trail> {
    trails
        .into_iter()
        .filter(|trail| match validate_trail(trail) {
            Ok(()) => true,
            Err(err) => {
                warn!("rejecting trail {:?}: {err}", trail.external_id);
                run.record_failure(trail.external_id, FailureStage::Validation, err.to_string());
                false
            }
        })
        .collect()
}
