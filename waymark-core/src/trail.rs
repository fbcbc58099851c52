//! Normalised trail records.

use std::collections::BTreeSet;
use std::time::SystemTime;

use crate::{Coordinate, Difficulty, TrailMarking, Waypoint};

/// Store-assigned identifier of a trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct TrailId(pub u64);

impl std::fmt::Display for TrailId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One member fragment of a trail, in route order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrailSegment {
    /// Provider identifier of the fragment.
    pub fragment_id: u64,
    /// Zero-based position within the trail.
    pub sequence_order: u32,
    /// Length of the fragment in kilometres.
    pub length_km: f64,
}

/// A hiking trail ready for persistence.
///
/// `id` is `None` until a store has saved the trail. `external_id`, when
/// present, is unique across a store.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trail {
    /// Store-assigned identifier.
    pub id: Option<TrailId>,
    /// Upstream identifier used for deduplication.
    pub external_id: Option<u64>,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Signpost reference code.
    pub reference: Option<String>,
    /// Length in kilometres.
    pub distance_km: f64,
    /// Total ascent in metres.
    pub elevation_gain: u32,
    /// Total descent in metres.
    pub elevation_loss: u32,
    /// Estimated walking time in minutes.
    pub duration_minutes: u32,
    /// Steepest segment, in percent.
    pub max_slope: f64,
    /// Average climbing gradient, in percent.
    pub avg_slope: f64,
    /// Highest point in metres.
    pub max_elevation: i32,
    /// Terrain tags.
    pub terrain: BTreeSet<String>,
    /// Difficulty grade.
    pub difficulty: Difficulty,
    /// Hazard tags.
    pub hazards: BTreeSet<String>,
    /// Painted marking.
    pub marking: TrailMarking,
    /// Ordered waypoints.
    pub waypoints: Vec<Waypoint>,
    /// Ordered member fragments.
    pub segments: Vec<TrailSegment>,
    /// Assembled geometry.
    pub geometry: Vec<Coordinate>,
    /// Label of the data source, e.g. `openstreetmap`.
    pub source: String,
    /// Set by the store on first save.
    pub created_at: Option<SystemTime>,
    /// Set by the store on every save.
    pub updated_at: Option<SystemTime>,
}

impl Trail {
    /// Copy the attributes refreshed by re-ingestion from `fresh`.
    ///
    /// Identity, external id, waypoints, source and timestamps stay as they
    /// are on `self`.
    pub fn merge_from(&mut self, fresh: Self) {
        self.name = fresh.name;
        self.description = fresh.description;
        self.reference = fresh.reference;
        self.distance_km = fresh.distance_km;
        self.elevation_gain = fresh.elevation_gain;
        self.elevation_loss = fresh.elevation_loss;
        self.duration_minutes = fresh.duration_minutes;
        self.max_slope = fresh.max_slope;
        self.avg_slope = fresh.avg_slope;
        self.max_elevation = fresh.max_elevation;
        self.geometry = fresh.geometry;
        self.segments = fresh.segments;
        self.difficulty = fresh.difficulty;
        self.terrain = fresh.terrain;
        self.hazards = fresh.hazards;
        self.marking = fresh.marking;
    }
}
