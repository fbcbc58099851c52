//! Raw route data as delivered by a geodata query service.
//!
//! A [`RawRoute`] references the ordered ids of the map fragments that make
//! up a trail, together with the fragments that could be resolved. These
//! values live only for the duration of an ingestion run.

use std::collections::HashMap;

use geo::Coord;

/// A position on the earth's surface with an optional elevation.
///
/// An absent elevation is distinct from an elevation of zero metres.
///
/// # Examples
///
/// ```
/// use waymark_core::Coordinate;
///
/// let summit = Coordinate::with_elevation(25.46, 45.41, 2505.0);
/// assert_eq!(summit.elevation, Some(2505.0));
/// assert!(Coordinate::new(25.46, 45.41).elevation.is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
    /// Elevation in metres, when known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub elevation: Option<f64>,
}

impl Coordinate {
    /// Create a coordinate without elevation.
    #[must_use]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self {
            lon,
            lat,
            elevation: None,
        }
    }

    /// Create a coordinate with a known elevation.
    #[must_use]
    pub const fn with_elevation(lon: f64, lat: f64, elevation: f64) -> Self {
        Self {
            lon,
            lat,
            elevation: Some(elevation),
        }
    }

    /// Elevation in metres, treating an unknown elevation as zero.
    #[must_use]
    pub fn elevation_or_zero(&self) -> f64 {
        self.elevation.unwrap_or(0.0)
    }

    /// Planar position as a `geo` coordinate (`x = lon`, `y = lat`).
    #[must_use]
    pub const fn position(&self) -> Coord<f64> {
        Coord {
            x: self.lon,
            y: self.lat,
        }
    }
}

/// One piece of a trail's geometry as stored by the map provider.
#[derive(Debug, Clone, PartialEq)]
pub struct PathFragment {
    /// Provider identifier of the fragment.
    pub id: u64,
    /// Ordered coordinates along the fragment.
    pub coordinates: Vec<Coordinate>,
}

impl PathFragment {
    /// Create a fragment from its id and coordinates.
    #[must_use]
    pub const fn new(id: u64, coordinates: Vec<Coordinate>) -> Self {
        Self { id, coordinates }
    }

    /// First coordinate, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Coordinate> {
        self.coordinates.first()
    }

    /// Last coordinate, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Coordinate> {
        self.coordinates.last()
    }

    /// Whether the fragment carries no coordinates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

/// A route relation as returned by the upstream service, before
/// normalisation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRoute {
    /// Upstream identifier of the route.
    pub external_id: u64,
    /// Human-readable name.
    pub name: Option<String>,
    /// Route kind, e.g. `hiking` or `foot`.
    pub route_kind: Option<String>,
    /// Reference code painted on signposts.
    pub reference: Option<String>,
    /// Network classification, e.g. `lwn`.
    pub network: Option<String>,
    /// Maintaining organisation.
    pub operator: Option<String>,
    /// Raw marking symbol in `background:foreground` form.
    pub marking_symbol: Option<String>,
    /// Free-text difficulty hint supplied by mappers.
    pub difficulty_hint: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Member fragment ids in the order the provider lists them.
    pub fragment_ids: Vec<u64>,
    /// Fragments that were resolved, keyed by id.
    pub fragments: HashMap<u64, PathFragment>,
}

impl RawRoute {
    /// Create an empty route with the given upstream identifier.
    #[must_use]
    pub fn new(external_id: u64) -> Self {
        Self {
            external_id,
            ..Self::default()
        }
    }

    /// Set the route name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the difficulty hint.
    #[must_use]
    pub fn with_difficulty_hint(mut self, hint: impl Into<String>) -> Self {
        self.difficulty_hint = Some(hint.into());
        self
    }

    /// Set the marking symbol.
    #[must_use]
    pub fn with_marking_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.marking_symbol = Some(symbol.into());
        self
    }

    /// Append a member fragment, recording both its id and its geometry.
    #[must_use]
    pub fn with_fragment(mut self, fragment: PathFragment) -> Self {
        self.fragment_ids.push(fragment.id);
        self.fragments.insert(fragment.id, fragment);
        self
    }

    /// Look up a resolved fragment by id.
    #[must_use]
    pub fn fragment(&self, id: u64) -> Option<&PathFragment> {
        self.fragments.get(&id)
    }
}
