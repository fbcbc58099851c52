//! Stitch unordered path fragments into one continuous polyline.
//!
//! Map providers split a trail into many ways whose direction and order do
//! not necessarily follow the walking direction. [`FragmentAssembler`]
//! rebuilds a single coordinate sequence greedily: it starts at the first
//! usable fragment and repeatedly attaches the next fragment whose start or
//! end touches the chain's current tail.
//!
//! The search is O(n²) in the number of fragments and never backtracks. When
//! no fragment touches the tail the remaining fragments are appended in the
//! order they were requested, which can leave visible jumps in the geometry.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::{Coordinate, PathFragment};

/// Maximum per-axis offset, in degrees, for two endpoints to be joined.
pub const DEFAULT_JOIN_TOLERANCE: f64 = 1e-4;

/// Greedy fragment stitcher.
///
/// # Examples
/// ```
/// use std::collections::HashMap;
/// use waymark_core::{Coordinate, FragmentAssembler, PathFragment};
///
/// let a = PathFragment::new(1, vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0)]);
/// // Stored back to front.
/// let b = PathFragment::new(2, vec![Coordinate::new(0.0, 2.0), Coordinate::new(0.0, 1.0)]);
/// let fragments = HashMap::from([(1, a), (2, b)]);
///
/// let chain = FragmentAssembler::default().assemble(&[1, 2], &fragments);
/// let lats: Vec<f64> = chain.iter().map(|c| c.lat).collect();
/// assert_eq!(lats, vec![0.0, 1.0, 1.0, 2.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentAssembler {
    tolerance: f64,
}

impl Default for FragmentAssembler {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_JOIN_TOLERANCE,
        }
    }
}

impl FragmentAssembler {
    /// Create an assembler joining endpoints closer than `tolerance` degrees
    /// on both axes.
    #[must_use]
    pub const fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Join tolerance in degrees.
    #[must_use]
    pub const fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Assemble the fragments named by `order` into one coordinate sequence.
    ///
    /// Ids that do not resolve, or resolve to a fragment without coordinates,
    /// are skipped. An id listed more than once is used once. Shared joint
    /// coordinates appear twice in the output. Returns an empty vector when
    /// nothing resolves.
    #[must_use]
    pub fn assemble<S: std::hash::BuildHasher>(
        &self,
        order: &[u64],
        fragments: &HashMap<u64, PathFragment, S>,
    ) -> Vec<Coordinate> {
        let candidates = Self::usable_fragments(order, fragments);
        let Some((first, rest)) = candidates.split_first() else {
            return Vec::new();
        };

        let mut chain = first.coordinates.clone();
        let mut used = vec![false; rest.len()];

        while let Some(tail) = chain.last().copied() {
            let Some((index, reversed)) = self.find_next(&tail, rest, &used) else {
                break;
            };
            let Some(next) = rest.get(index) else { break };
            if let Some(flag) = used.get_mut(index) {
                *flag = true;
            }
            if reversed {
                chain.extend(next.coordinates.iter().rev().copied());
            } else {
                chain.extend(next.coordinates.iter().copied());
            }
        }

        let leftovers: Vec<&PathFragment> = rest
            .iter()
            .zip(&used)
            .filter(|(_, used)| !**used)
            .map(|(fragment, _)| *fragment)
            .collect();
        if !leftovers.is_empty() {
            debug!(
                "{} fragment(s) did not connect; appending in requested order",
                leftovers.len()
            );
            for fragment in leftovers {
                chain.extend(fragment.coordinates.iter().copied());
            }
        }

        chain
    }

    fn usable_fragments<'a, S: std::hash::BuildHasher>(
        order: &[u64],
        fragments: &'a HashMap<u64, PathFragment, S>,
    ) -> Vec<&'a PathFragment> {
        let mut seen = HashSet::new();
        order
            .iter()
            .filter(|id| seen.insert(**id))
            .filter_map(|id| fragments.get(id))
            .filter(|fragment| !fragment.is_empty())
            .collect()
    }

    /// Find the first unused fragment touching `tail`, and whether it must be
    /// reversed.
    fn find_next(
        &self,
        tail: &Coordinate,
        candidates: &[&PathFragment],
        used: &[bool],
    ) -> Option<(usize, bool)> {
        candidates
            .iter()
            .zip(used)
            .enumerate()
            .filter(|(_, (_, used))| !**used)
            .find_map(|(index, (fragment, _))| {
                if fragment.first().is_some_and(|start| self.touches(tail, start)) {
                    Some((index, false))
                } else if fragment.last().is_some_and(|end| self.touches(tail, end)) {
                    Some((index, true))
                } else {
                    None
                }
            })
    }

    fn touches(&self, a: &Coordinate, b: &Coordinate) -> bool {
        (a.lon - b.lon).abs() < self.tolerance && (a.lat - b.lat).abs() < self.tolerance
    }
}
