//! Property-based tests for fragment assembly and difficulty inference.
//!
//! # Invariants tested
//!
//! - **Coordinate conservation:** assembling distinct non-empty fragments
//!   emits exactly the sum of their coordinate counts.
//! - **Orientation recovery:** a connected chain whose first fragment runs
//!   forwards is rebuilt in walking order, whatever the direction the other
//!   fragments are stored in.
//! - **Monotonic grading:** difficulty never decreases as slope or gain grow.

use std::collections::HashMap;

use proptest::prelude::*;
use waymark_core::{Coordinate, Difficulty, FragmentAssembler, PathFragment};

/// Spacing between consecutive points, well above the join tolerance.
const STEP_DEGREES: f64 = 0.01;

fn point(index: usize) -> Coordinate {
    let offset = f64::from(u32::try_from(index).unwrap_or(u32::MAX)) * STEP_DEGREES;
    Coordinate::with_elevation(25.0 + offset, 45.0, 1000.0 + offset * 100.0)
}

/// Split a straight walk into fragments of the given lengths (each at least
/// two points), sharing endpoints, optionally stored back to front.
fn chain(lengths: &[usize], reversed: &[bool]) -> Vec<PathFragment> {
    let mut start = 0;
    lengths
        .iter()
        .zip(reversed)
        .enumerate()
        .map(|(index, (len, flip))| {
            let mut coordinates: Vec<Coordinate> = (start..start + len).map(point).collect();
            start += len - 1;
            if *flip {
                coordinates.reverse();
            }
            PathFragment::new(index as u64 + 1, coordinates)
        })
        .collect()
}

fn expected_walk(lengths: &[usize]) -> Vec<Coordinate> {
    let mut start = 0;
    let mut walk = Vec::new();
    for len in lengths {
        walk.extend((start..start + len).map(point));
        start += len - 1;
    }
    walk
}

fn fragment_map(fragments: &[PathFragment]) -> HashMap<u64, PathFragment> {
    fragments.iter().map(|f| (f.id, f.clone())).collect()
}

fn chain_strategy() -> impl Strategy<Value = (Vec<usize>, Vec<bool>)> {
    (1_usize..8).prop_flat_map(|count| {
        (
            proptest::collection::vec(2_usize..6, count),
            proptest::collection::vec(any::<bool>(), count),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Property: every coordinate of every used fragment is emitted once.
    #[test]
    fn assembly_conserves_coordinates(
        (lengths, reversed) in chain_strategy(),
        order_seed in any::<u64>(),
    ) {
        let fragments = chain(&lengths, &reversed);
        let mut order: Vec<u64> = fragments.iter().map(|f| f.id).collect();
        let len = order.len();
        let rotation = usize::try_from(order_seed % len as u64).unwrap_or(0);
        order.rotate_left(rotation);

        let assembled = FragmentAssembler::default().assemble(&order, &fragment_map(&fragments));

        prop_assert_eq!(assembled.len(), lengths.iter().sum::<usize>());
    }

    /// Property: a chain starting with a forward fragment is rebuilt in
    /// walking order.
    #[test]
    fn assembly_recovers_orientation((lengths, mut reversed) in chain_strategy()) {
        if let Some(first) = reversed.first_mut() {
            *first = false;
        }
        let fragments = chain(&lengths, &reversed);
        let order: Vec<u64> = fragments.iter().map(|f| f.id).collect();

        let assembled = FragmentAssembler::default().assemble(&order, &fragment_map(&fragments));

        prop_assert_eq!(assembled, expected_walk(&lengths));
    }

    /// Property: with gain fixed, a steeper trail is never graded easier.
    #[test]
    fn difficulty_is_monotonic_in_slope(
        gain in 0_u32..5000,
        slope in 0.0_f64..80.0,
        extra in 0.0_f64..40.0,
    ) {
        let gentle = Difficulty::infer_from_metrics(gain, slope);
        let steep = Difficulty::infer_from_metrics(gain, slope + extra);
        prop_assert!(gentle <= steep, "{gentle} graded above {steep}");
    }

    /// Property: below every slope threshold, more climbing is never graded
    /// easier.
    #[test]
    fn difficulty_is_monotonic_in_gain(
        gain in 0_u32..5000,
        extra in 0_u32..3000,
        slope in 0.0_f64..=10.0,
    ) {
        let short = Difficulty::infer_from_metrics(gain, slope);
        let long = Difficulty::infer_from_metrics(gain + extra, slope);
        prop_assert!(short <= long, "{short} graded above {long}");
        prop_assert_eq!(short.rank() <= long.rank(), true);
    }
}
