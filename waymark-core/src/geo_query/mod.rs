//! Query a geodata service for hiking route relations.
//!
//! The [`GeoQuery`] trait abstracts the upstream service. Implementations own
//! rate limiting and retries; callers only see the final outcome. Bounding
//! boxes use WGS84 coordinates with `x = longitude` and `y = latitude`.

mod error;
mod region;

use geo::{Coord, Rect};

use crate::RawRoute;

pub use error::{GeoQueryError, UpstreamFailure};
pub use region::Region;

/// Degrees of latitude (and, approximately, longitude) per kilometre.
pub const DEGREES_PER_KM: f64 = 1.0 / 111.0;

/// Build a bounding box from its south, west, north and east edges.
///
/// # Examples
/// ```
/// use waymark_core::geo_query::bounding_box;
///
/// let bbox = bounding_box(45.20, 25.40, 45.50, 25.70);
/// assert_eq!(bbox.min().y, 45.20);
/// assert_eq!(bbox.max().x, 25.70);
/// ```
#[must_use]
pub fn bounding_box(south: f64, west: f64, north: f64, east: f64) -> Rect<f64> {
    Rect::new(Coord { x: west, y: south }, Coord { x: east, y: north })
}

/// Square bounding box extending `radius_km` from a point on every side.
///
/// The conversion uses a flat 1/111 degrees per kilometre on both axes, so
/// boxes away from the equator are wider than `radius_km` east to west.
#[must_use]
pub fn bbox_around(lat: f64, lon: f64, radius_km: f64) -> Rect<f64> {
    let delta = radius_km * DEGREES_PER_KM;
    bounding_box(lat - delta, lon - delta, lat + delta, lon + delta)
}

/// Access to an upstream source of route relations.
///
/// # Examples
///
/// ```rust
/// use geo::Rect;
/// use waymark_core::{GeoQuery, GeoQueryError, RawRoute};
///
/// struct Fixed(Vec<RawRoute>);
///
/// impl GeoQuery for Fixed {
///     fn query_by_bounding_box(&self, _: &Rect<f64>) -> Result<Vec<RawRoute>, GeoQueryError> {
///         Ok(self.0.clone())
///     }
///
///     fn query_by_id(&self, id: u64) -> Result<Option<RawRoute>, GeoQueryError> {
///         Ok(self.0.iter().find(|r| r.external_id == id).cloned())
///     }
/// }
///
/// let source = Fixed(vec![RawRoute::new(3)]);
/// assert_eq!(source.query_nearby(45.4, 25.5, 5.0)?.len(), 1);
/// assert!(source.query_by_id(4)?.is_none());
/// # Ok::<(), GeoQueryError>(())
/// ```
pub trait GeoQuery {
    /// Every hiking route relation intersecting `bbox`.
    fn query_by_bounding_box(&self, bbox: &Rect<f64>) -> Result<Vec<RawRoute>, GeoQueryError>;

    /// The route relation with the given upstream id, if it exists.
    fn query_by_id(&self, external_id: u64) -> Result<Option<RawRoute>, GeoQueryError>;

    /// Route relations within `radius_km` of a point.
    fn query_nearby(
        &self,
        lat: f64,
        lon: f64,
        radius_km: f64,
    ) -> Result<Vec<RawRoute>, GeoQueryError> {
        self.query_by_bounding_box(&bbox_around(lat, lon, radius_km))
    }

    /// Route relations inside a preset region.
    fn query_region(&self, region: &Region) -> Result<Vec<RawRoute>, GeoQueryError> {
        self.query_by_bounding_box(region.bbox())
    }
}

impl<T: GeoQuery + ?Sized> GeoQuery for Box<T> {
    fn query_by_bounding_box(&self, bbox: &Rect<f64>) -> Result<Vec<RawRoute>, GeoQueryError> {
        (**self).query_by_bounding_box(bbox)
    }

    fn query_by_id(&self, external_id: u64) -> Result<Option<RawRoute>, GeoQueryError> {
        (**self).query_by_id(external_id)
    }

    fn query_nearby(
        &self,
        lat: f64,
        lon: f64,
        radius_km: f64,
    ) -> Result<Vec<RawRoute>, GeoQueryError> {
        (**self).query_nearby(lat, lon, radius_km)
    }

    fn query_region(&self, region: &Region) -> Result<Vec<RawRoute>, GeoQueryError> {
        (**self).query_region(region)
    }
}
