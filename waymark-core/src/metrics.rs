//! Distance, elevation and slope figures for an ordered polyline.
//!
//! Distances use the haversine formula on a sphere of radius
//! [`EARTH_RADIUS_KM`]. Missing elevations count as zero metres when
//! computing deltas.

use crate::Coordinate;

/// Mean earth radius used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Assumed walking speed on the flat, in km/h.
const WALKING_SPEED_KMH: f64 = 3.0;

/// Extra half hour per 300 m climbed.
const CLIMB_METRES_PER_HALF_HOUR: f64 = 300.0;

/// Great-circle distance between two coordinates, in kilometres.
///
/// # Examples
/// ```
/// use waymark_core::{Coordinate, metrics::haversine_km};
///
/// let a = Coordinate::new(0.0, 0.0);
/// let b = Coordinate::new(0.0, 1.0);
/// assert!((haversine_km(&a, &b) - 111.19).abs() < 0.01);
/// ```
#[must_use]
pub fn haversine_km(from: &Coordinate, to: &Coordinate) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lon - from.lon).to_radians();
    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Total length of a polyline in kilometres.
#[must_use]
pub fn path_length_km(coordinates: &[Coordinate]) -> f64 {
    coordinates
        .windows(2)
        .map(|pair| match pair {
            [from, to] => haversine_km(from, to),
            _ => 0.0,
        })
        .sum()
}

/// Figures derived from an assembled trail geometry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrailMetrics {
    /// Length in kilometres.
    pub distance_km: f64,
    /// Total ascent in whole metres.
    pub elevation_gain: u32,
    /// Total descent in whole metres.
    pub elevation_loss: u32,
    /// Highest present elevation in whole metres, 0 when none is known.
    pub max_elevation: i32,
    /// Steepest non-degenerate segment, in percent.
    pub max_slope: f64,
    /// Ascent over distance, in percent.
    pub avg_slope: f64,
    /// Walking time estimate in minutes.
    pub duration_minutes: u32,
}

impl TrailMetrics {
    /// Compute metrics for an ordered coordinate sequence.
    ///
    /// Each positive or negative elevation delta is truncated to whole
    /// metres as it is added, and the average slope uses that whole-metre
    /// gain.
    #[must_use]
    pub fn from_coordinates(coordinates: &[Coordinate]) -> Self {
        let mut distance_km = 0.0;
        let mut elevation_gain = 0_u32;
        let mut elevation_loss = 0_u32;
        let mut max_slope = 0.0_f64;

        for pair in coordinates.windows(2) {
            let [from, to] = pair else { continue };
            let segment_km = haversine_km(from, to);
            let delta = to.elevation_or_zero() - from.elevation_or_zero();
            distance_km += segment_km;
            if delta > 0.0 {
                elevation_gain = elevation_gain.saturating_add(truncate_u32(delta));
            } else {
                elevation_loss = elevation_loss.saturating_add(truncate_u32(-delta));
            }
            let segment_m = segment_km * 1000.0;
            if segment_m > 0.0 {
                max_slope = max_slope.max(delta.abs() / segment_m * 100.0);
            }
        }

        let max_elevation = coordinates
            .iter()
            .filter_map(|c| c.elevation)
            .reduce(f64::max)
            .map_or(0, truncate_i32);

        let distance_m = distance_km * 1000.0;
        let avg_slope = if distance_m > 0.0 {
            f64::from(elevation_gain) / distance_m * 100.0
        } else {
            0.0
        };

        Self {
            distance_km,
            elevation_gain,
            elevation_loss,
            max_elevation,
            max_slope,
            avg_slope,
            duration_minutes: estimate_duration_minutes(distance_km, elevation_gain),
        }
    }
}

/// Walking time: 3 km/h on the flat plus half an hour per 300 m climbed.
///
/// Returns 0 for a zero-length trail.
#[must_use]
pub fn estimate_duration_minutes(distance_km: f64, elevation_gain: u32) -> u32 {
    if distance_km <= 0.0 {
        return 0;
    }
    let flat = distance_km / WALKING_SPEED_KMH * 60.0;
    let climb = f64::from(elevation_gain) / CLIMB_METRES_PER_HALF_HOUR * 30.0;
    truncate_u32(flat + climb)
}

// `as` saturates: negatives and NaN become 0.
fn truncate_u32(value: f64) -> u32 {
    value as u32
}

fn truncate_i32(value: f64) -> i32 {
    value as i32
}
