//! Overpass JSON response types and their conversion into raw routes.

use std::collections::HashMap;

use log::debug;
use serde::Deserialize;
use waymark_core::{Coordinate, PathFragment, RawRoute};

/// Top-level Overpass response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OverpassResponse {
    /// Returned elements; absent when the query matched nothing.
    #[serde(default)]
    pub elements: Vec<Element>,
    /// Server-side error or warning text.
    #[serde(default)]
    pub remark: Option<String>,
}

/// A single element of the `elements` array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    /// A way with inline node geometry.
    Way(WayElement),
    /// A route relation.
    Relation(RelationElement),
    /// Nodes, areas and anything else.
    #[serde(other)]
    Other,
}

/// A way record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WayElement {
    /// OSM way id.
    pub id: u64,
    /// Node positions; `null` entries mark nodes outside the result set.
    #[serde(default)]
    pub geometry: Vec<Option<GeometryPoint>>,
}

/// A relation record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RelationElement {
    /// OSM relation id.
    pub id: u64,
    /// Relation tags.
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
    /// Relation members in order.
    #[serde(default)]
    pub members: Vec<Member>,
}

/// A relation member.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Member {
    /// Member element type: `way`, `node` or `relation`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Member element id.
    #[serde(rename = "ref")]
    pub reference: u64,
    /// Member role, often empty.
    #[serde(default)]
    pub role: String,
    /// Inline geometry emitted by `out geom`.
    #[serde(default)]
    pub geometry: Vec<Option<GeometryPoint>>,
}

/// A node position.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GeometryPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Elevation in metres, when the payload carries one.
    #[serde(default, alias = "ele")]
    pub elevation: Option<f64>,
}

impl GeometryPoint {
    fn coordinate(self) -> Coordinate {
        Coordinate {
            lon: self.lon,
            lat: self.lat,
            elevation: self.elevation,
        }
    }
}

fn coordinates(geometry: &[Option<GeometryPoint>]) -> Vec<Coordinate> {
    geometry
        .iter()
        .flatten()
        .map(|point| point.coordinate())
        .collect()
}

impl OverpassResponse {
    /// Convert the response into raw routes, one per tagged relation.
    ///
    /// Way members resolve against way elements first and fall back to the
    /// member's inline geometry. Members that resolve to nothing stay listed
    /// in the route's fragment ids without a fragment.
    #[must_use]
    pub fn into_routes(self) -> Vec<RawRoute> {
        let mut ways: HashMap<u64, PathFragment> = HashMap::new();
        let mut relations = Vec::new();
        for element in self.elements {
            match element {
                Element::Way(way) => {
                    let fragment = PathFragment::new(way.id, coordinates(&way.geometry));
                    ways.insert(way.id, fragment);
                }
                Element::Relation(relation) => relations.push(relation),
                Element::Other => {}
            }
        }

        relations
            .into_iter()
            .filter_map(|relation| relation_to_route(relation, &ways))
            .collect()
    }
}

fn relation_to_route(
    relation: RelationElement,
    ways: &HashMap<u64, PathFragment>,
) -> Option<RawRoute> {
    let Some(mut tags) = relation.tags.filter(|tags| !tags.is_empty()) else {
        debug!("dropping relation {} without tags", relation.id);
        return None;
    };

    let mut route = RawRoute {
        name: tags.remove("name"),
        route_kind: tags.remove("route"),
        reference: tags.remove("ref"),
        network: tags.remove("network"),
        operator: tags.remove("operator"),
        marking_symbol: tags.remove("osmc:symbol"),
        difficulty_hint: tags.remove("hiking:difficulty"),
        description: tags.remove("description"),
        ..RawRoute::new(relation.id)
    };

    for member in relation.members.into_iter().filter(|m| m.kind == "way") {
        route.fragment_ids.push(member.reference);
        let fragment = ways
            .get(&member.reference)
            .filter(|fragment| !fragment.is_empty())
            .cloned()
            .or_else(|| {
                let inline = coordinates(&member.geometry);
                (!inline.is_empty()).then(|| PathFragment::new(member.reference, inline))
            });
        if let Some(fragment) = fragment {
            route.fragments.insert(member.reference, fragment);
        }
    }
    Some(route)
}
