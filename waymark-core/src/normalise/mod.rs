//! Turn raw upstream routes into normalised [`Trail`] records.
//!
//! [`RouteNormaliser`] assembles the route geometry, computes its metrics and
//! derives difficulty, marking, terrain, hazards, waypoints and segments.
//! Store-owned fields (`id`, timestamps) are left unset.

mod hazards;
mod waypoints;

use log::debug;
use thiserror::Error;

use crate::metrics::{TrailMetrics, path_length_km};
use crate::{Difficulty, FragmentAssembler, RawRoute, Trail, TrailMarking, TrailSegment};

pub use hazards::{HazardRule, default_hazard_rules};

/// Source label recorded on trails built from OpenStreetMap data.
pub const OPENSTREETMAP_SOURCE: &str = "openstreetmap";

/// Name used when a route has none.
pub const UNNAMED_TRAIL: &str = "Unnamed Trail";

/// Errors returned by [`RouteNormaliser::normalise`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum NormalisationError {
    /// None of the route's fragments resolved to coordinates.
    #[error("route {external_id} has no resolvable geometry")]
    EmptyGeometry {
        /// Upstream identifier of the route.
        external_id: u64,
    },
}

/// Converts [`RawRoute`] values into [`Trail`] values.
///
/// # Examples
/// ```
/// use waymark_core::{Coordinate, Difficulty, PathFragment, RawRoute, RouteNormaliser};
///
/// let route = RawRoute::new(42)
///     .with_name("  Valea Albă  ")
///     .with_fragment(PathFragment::new(
///         1,
///         vec![
///             Coordinate::with_elevation(25.540, 45.348, 950.0),
///             Coordinate::with_elevation(25.542, 45.350, 1000.0),
///         ],
///     ));
///
/// let trail = RouteNormaliser::default().normalise(&route)?;
/// assert_eq!(trail.name, "Valea Albă");
/// assert_eq!(trail.external_id, Some(42));
/// assert_eq!(trail.elevation_gain, 50);
/// assert!(trail.difficulty <= Difficulty::Medium);
/// # Ok::<(), waymark_core::NormalisationError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RouteNormaliser {
    assembler: FragmentAssembler,
    hazard_rules: Vec<HazardRule>,
    source: String,
}

impl Default for RouteNormaliser {
    fn default() -> Self {
        Self {
            assembler: FragmentAssembler::default(),
            hazard_rules: default_hazard_rules(),
            source: OPENSTREETMAP_SOURCE.to_owned(),
        }
    }
}

impl RouteNormaliser {
    /// Use a different fragment assembler.
    #[must_use]
    pub const fn with_assembler(mut self, assembler: FragmentAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    /// Replace the regional hazard rules.
    #[must_use]
    pub fn with_hazard_rules(mut self, rules: Vec<HazardRule>) -> Self {
        self.hazard_rules = rules;
        self
    }

    /// Add one regional hazard rule.
    #[must_use]
    pub fn with_hazard_rule(mut self, rule: HazardRule) -> Self {
        self.hazard_rules.push(rule);
        self
    }

    /// Set the source label recorded on produced trails.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Regional hazard rules in use.
    #[must_use]
    pub fn hazard_rules(&self) -> &[HazardRule] {
        &self.hazard_rules
    }

    /// Normalise a raw route.
    ///
    /// # Errors
    ///
    /// Returns [`NormalisationError::EmptyGeometry`] when no fragment of the
    /// route resolves to coordinates.
    pub fn normalise(&self, route: &RawRoute) -> Result<Trail, NormalisationError> {
        let geometry = self.assembler.assemble(&route.fragment_ids, &route.fragments);
        if geometry.is_empty() {
            return Err(NormalisationError::EmptyGeometry {
                external_id: route.external_id,
            });
        }

        let metrics = TrailMetrics::from_coordinates(&geometry);
        let difficulty = route
            .difficulty_hint
            .as_deref()
            .map_or_else(
                || Difficulty::infer_from_metrics(metrics.elevation_gain, metrics.max_slope),
                Difficulty::from_hint,
            );
        let name = route
            .name
            .as_deref()
            .map_or_else(|| UNNAMED_TRAIL.to_owned(), |name| name.trim().to_owned());
        let hazards = hazards::hazard_tags(
            difficulty,
            &metrics,
            route.name.as_deref(),
            &self.hazard_rules,
        );

        debug!(
            "normalised route {} into {} coordinates, {:.2} km, {difficulty}",
            route.external_id,
            geometry.len(),
            metrics.distance_km
        );

        Ok(Trail {
            id: None,
            external_id: Some(route.external_id),
            waypoints: waypoints::generate(&geometry, &name),
            segments: segments(route),
            name,
            description: route.description.clone(),
            reference: route.reference.clone(),
            distance_km: metrics.distance_km,
            elevation_gain: metrics.elevation_gain,
            elevation_loss: metrics.elevation_loss,
            duration_minutes: metrics.duration_minutes,
            max_slope: metrics.max_slope,
            avg_slope: metrics.avg_slope,
            max_elevation: metrics.max_elevation,
            terrain: hazards::terrain_tags(&metrics),
            difficulty,
            hazards,
            marking: TrailMarking::parse(route.marking_symbol.as_deref()),
            geometry,
            source: self.source.clone(),
            created_at: None,
            updated_at: None,
        })
    }
}

/// One segment per resolvable member fragment, in requested order.
fn segments(route: &RawRoute) -> Vec<TrailSegment> {
    let mut seen = std::collections::HashSet::new();
    route
        .fragment_ids
        .iter()
        .filter(|id| seen.insert(**id))
        .filter_map(|id| route.fragment(*id))
        .zip(0_u32..)
        .map(|(fragment, sequence_order)| TrailSegment {
            fragment_id: fragment.id,
            sequence_order,
            length_km: path_length_km(&fragment.coordinates),
        })
        .collect()
}
