//! Evenly spaced waypoints along an assembled geometry.

use crate::{Coordinate, Waypoint, WaypointKind};

/// Roughly how many intermediate waypoints a long trail receives.
const INTERMEDIATE_WAYPOINTS: usize = 10;

/// Build START, intermediate JUNCTION and END waypoints.
///
/// Intermediate points sit at every `max(1, n / 10)`-th coordinate,
/// excluding the final one. Returns an empty list for an empty geometry.
pub(crate) fn generate(geometry: &[Coordinate], name: &str) -> Vec<Waypoint> {
    let (Some(first), Some(last)) = (geometry.first(), geometry.last()) else {
        return Vec::new();
    };

    let mut waypoints = vec![waypoint(0, first, format!("Start: {name}"), WaypointKind::Start)];
    let step = (geometry.len() / INTERMEDIATE_WAYPOINTS).max(1);
    let end_index = geometry.len().saturating_sub(1);
    for coordinate in geometry
        .iter()
        .take(end_index)
        .skip(step)
        .step_by(step)
    {
        let order = next_order(&waypoints);
        waypoints.push(waypoint(
            order,
            coordinate,
            format!("Waypoint {order}"),
            WaypointKind::Junction,
        ));
    }
    let order = next_order(&waypoints);
    waypoints.push(waypoint(order, last, format!("End: {name}"), WaypointKind::End));
    waypoints
}

fn next_order(waypoints: &[Waypoint]) -> u32 {
    u32::try_from(waypoints.len()).unwrap_or(u32::MAX)
}

fn waypoint(order: u32, at: &Coordinate, label: String, kind: WaypointKind) -> Waypoint {
    Waypoint {
        sequence_order: order,
        latitude: at.lat,
        longitude: at.lon,
        elevation: at.elevation,
        label,
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn line(n: usize) -> Vec<Coordinate> {
        (0..n)
            .map(|i| Coordinate::new(f64::from(u32::try_from(i).unwrap_or(0)) * 0.001, 45.0))
            .collect()
    }

    #[rstest]
    #[case(1, 2)]
    #[case(2, 2)]
    #[case(3, 3)]
    #[case(10, 10)]
    #[case(25, 13)]
    #[case(100, 11)]
    fn waypoint_counts(#[case] points: usize, #[case] expected: usize) {
        let waypoints = generate(&line(points), "Ridge");
        assert_eq!(waypoints.len(), expected);
    }

    #[rstest]
    fn labels_and_orders() {
        let waypoints = generate(&line(3), "Ridge");
        let labels: Vec<&str> = waypoints.iter().map(|w| w.label.as_str()).collect();
        assert_eq!(labels, vec!["Start: Ridge", "Waypoint 1", "End: Ridge"]);
        let orders: Vec<u32> = waypoints.iter().map(|w| w.sequence_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert_eq!(waypoints.first().map(|w| w.kind), Some(WaypointKind::Start));
        assert_eq!(waypoints.get(1).map(|w| w.kind), Some(WaypointKind::Junction));
        assert_eq!(waypoints.last().map(|w| w.kind), Some(WaypointKind::End));
    }

    #[rstest]
    fn empty_geometry_has_no_waypoints() {
        assert!(generate(&[], "Ridge").is_empty());
    }
}
