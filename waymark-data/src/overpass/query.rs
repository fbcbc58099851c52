//! Overpass QL query text.

use geo::Rect;

/// Route types collected by area queries.
const ROUTE_TYPES: [&str; 3] = ["hiking", "foot", "alpine_hiking"];

/// Query every hiking route relation intersecting `bbox`.
///
/// Edges are formatted south, west, north, east with six decimals.
///
/// # Examples
/// ```
/// use waymark_core::geo_query::bounding_box;
/// use waymark_data::overpass::bounding_box_query;
///
/// let query = bounding_box_query(&bounding_box(45.2, 25.4, 45.5, 25.7), 60);
/// assert!(query.starts_with("[out:json][timeout:60][bbox:45.200000,25.400000,45.500000,25.700000];"));
/// assert!(query.ends_with("out geom;"));
/// ```
#[must_use]
pub fn bounding_box_query(bbox: &Rect<f64>, timeout_secs: u64) -> String {
    let min = bbox.min();
    let max = bbox.max();
    let relations: String = ROUTE_TYPES
        .iter()
        .map(|kind| format!("relation[type=route][route={kind}];"))
        .collect();
    format!(
        "[out:json][timeout:{timeout_secs}][bbox:{:.6},{:.6},{:.6},{:.6}];({relations});out geom;",
        min.y, min.x, max.y, max.x
    )
}

/// Query a single relation by id.
#[must_use]
pub fn relation_query(external_id: u64, timeout_secs: u64) -> String {
    format!("[out:json][timeout:{timeout_secs}];relation({external_id});out geom;")
}
