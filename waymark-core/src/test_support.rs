//! Test doubles for the trail store and geodata query traits, used by unit
//! and behaviour tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use geo::Rect;

use crate::{
    Coordinate, Difficulty, GeoQuery, GeoQueryError, MemoryTrailStore, RawRoute, StoreError,
    Trail, TrailMarking, TrailStore, UpstreamFailure,
};

/// A valid, unsaved trail with the given external id.
#[must_use]
pub fn sample_trail(external_id: u64) -> Trail {
    Trail {
        external_id: Some(external_id),
        name: format!("Trail {external_id}"),
        distance_km: 2.5,
        elevation_gain: 120,
        elevation_loss: 40,
        duration_minutes: 62,
        max_slope: 12.0,
        avg_slope: 4.8,
        max_elevation: 1180,
        difficulty: Difficulty::Medium,
        marking: TrailMarking::parse(Some("red:red_stripe")),
        geometry: vec![
            Coordinate::with_elevation(25.540, 45.348, 1060.0),
            Coordinate::with_elevation(25.560, 45.360, 1180.0),
        ],
        source: "openstreetmap".to_owned(),
        ..Trail::default()
    }
}

/// [`TrailStore`] wrapper counting calls and optionally failing saves.
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: MemoryTrailStore,
    saves: AtomicUsize,
    lookups: AtomicUsize,
    fail_saves_for: Mutex<Vec<u64>>,
}

impl RecordingStore {
    /// Create an empty recording store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every save of a trail with this external id fail.
    #[must_use]
    pub fn failing_saves_for(self, external_id: u64) -> Self {
        if let Ok(mut ids) = self.fail_saves_for.lock() {
            ids.push(external_id);
        }
        self
    }

    /// Number of `save` calls, including failed ones.
    #[must_use]
    pub fn save_calls(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Number of `find_by_external_id` calls.
    #[must_use]
    pub fn lookup_calls(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Number of stored trails.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl TrailStore for RecordingStore {
    fn find_by_external_id(&self, external_id: u64) -> Result<Option<Trail>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_external_id(external_id)
    }

    fn save(&self, trail: Trail) -> Result<Trail, StoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .fail_saves_for
            .lock()
            .is_ok_and(|ids| trail.external_id.is_some_and(|id| ids.contains(&id)));
        if failing {
            return Err(StoreError::Backend {
                message: "injected save failure".to_owned(),
            });
        }
        self.inner.save(trail)
    }

    fn find_all(&self) -> Result<Vec<Trail>, StoreError> {
        self.inner.find_all()
    }

    fn find_by_difficulty(&self, difficulty: Difficulty) -> Result<Vec<Trail>, StoreError> {
        self.inner.find_by_difficulty(difficulty)
    }

    fn find_by_source(&self, source: &str) -> Result<Vec<Trail>, StoreError> {
        self.inner.find_by_source(source)
    }
}

/// [`GeoQuery`] returning a fixed set of routes, or a fixed error.
///
/// Bounding-box queries return every route regardless of the box; id
/// queries return the last route with a matching id.
#[derive(Debug, Clone)]
pub struct StubGeoQuery {
    response: Result<Vec<RawRoute>, GeoQueryError>,
    calls: std::sync::Arc<AtomicUsize>,
}

impl StubGeoQuery {
    /// Answer every query from `routes`.
    #[must_use]
    pub fn with_routes(routes: Vec<RawRoute>) -> Self {
        Self {
            response: Ok(routes),
            calls: std::sync::Arc::default(),
        }
    }

    /// Fail every query with `error`.
    #[must_use]
    pub fn with_error(error: GeoQueryError) -> Self {
        Self {
            response: Err(error),
            calls: std::sync::Arc::default(),
        }
    }

    /// Fail every query as if the service were unreachable.
    #[must_use]
    pub fn unavailable(attempts: u32) -> Self {
        Self::with_error(GeoQueryError::UpstreamUnavailable {
            attempts,
            cause: UpstreamFailure::Network {
                url: "http://overpass.invalid/api/interpreter".to_owned(),
                message: "connection refused".to_owned(),
            },
        })
    }

    /// Number of queries answered so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl GeoQuery for StubGeoQuery {
    fn query_by_bounding_box(&self, _bbox: &Rect<f64>) -> Result<Vec<RawRoute>, GeoQueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }

    fn query_by_id(&self, external_id: u64) -> Result<Option<RawRoute>, GeoQueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone().map(|routes| {
            routes
                .into_iter()
                .rev()
                .find(|route| route.external_id == external_id)
        })
    }
}
