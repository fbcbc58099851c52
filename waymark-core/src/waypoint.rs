//! Points of note along a trail.

/// Category of a waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum WaypointKind {
    /// Trailhead.
    Start,
    /// End of the trail.
    End,
    /// Intermediate point or path junction.
    Junction,
    /// Summit.
    Peak,
    /// Mountain hut or shelter.
    Shelter,
    /// Water source.
    Water,
    /// Camping spot.
    Camping,
    /// Viewpoint.
    Viewpoint,
    /// Anything else.
    Other,
}

/// A labelled point along a trail.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    /// Zero-based position along the trail, strictly increasing.
    pub sequence_order: u32,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Elevation in metres, when known.
    pub elevation: Option<f64>,
    /// Display label.
    pub label: String,
    /// Category.
    pub kind: WaypointKind,
}
