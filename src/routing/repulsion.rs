use std::collections::{BTreeMap, HashSet};

use crate::config::EdgeRoutingConfig;
use crate::ir::EdgeId;

use super::geometry::{Point, cross, normalize, perpendicular, segment_distance, segment_intersection};
use super::spatial::{EdgeSegment, SpatialGrid};

/// Accumulated displacement per edge for one frame. Edges that never
/// conflicted are absent.
pub type OffsetMap = BTreeMap<EdgeId, Point>;

/// Fraction of the missing separation turned into force each pass.
pub const FORCE_DAMPING: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosePair {
    pub first: usize,
    pub second: usize,
    pub distance: f64,
}

/// Unique segment index pairs from different edges whose grid
/// neighbourhoods reach each other within `reach`, each reported once with
/// `first < second`.
pub fn candidate_pairs(grid: &SpatialGrid, reach: f64) -> Vec<(usize, usize)> {
    let segments = grid.segments();
    let mut checked: HashSet<(usize, usize)> = HashSet::new();
    let mut pairs = Vec::new();
    for idx in 0..segments.len() {
        for other in grid.query_within(idx, reach) {
            if segments[idx].edge == segments[other].edge {
                continue;
            }
            let key = (idx.min(other), idx.max(other));
            if checked.insert(key) {
                pairs.push(key);
            }
        }
    }
    pairs
}

/// Pairs of segments that cross each other.
pub fn detect_intersections(grid: &SpatialGrid) -> Vec<(usize, usize)> {
    let segments = grid.segments();
    candidate_pairs(grid, 0.0)
        .into_iter()
        .filter(|&(a, b)| {
            segment_intersection(
                segments[a].start,
                segments[a].end,
                segments[b].start,
                segments[b].end,
            )
            .is_some()
        })
        .collect()
}

/// Pairs of segments closer than `threshold`.
pub fn detect_proximity(grid: &SpatialGrid, threshold: f64) -> Vec<ClosePair> {
    let segments = grid.segments();
    candidate_pairs(grid, threshold)
        .into_iter()
        .filter_map(|(first, second)| {
            let distance = chord_distance(&segments[first], &segments[second]);
            (distance < threshold).then_some(ClosePair {
                first,
                second,
                distance,
            })
        })
        .collect()
}

fn chord_distance(a: &EdgeSegment, b: &EdgeSegment) -> f64 {
    segment_distance(a.start, a.end, b.start, b.end)
}

/// Push on `second` away from the line through `first`. `first` receives the
/// negation.
pub fn pair_force(first: &EdgeSegment, second: &EdgeSegment, distance: f64, min_distance: f64) -> Point {
    let error = min_distance - distance;
    if error <= 0.0 {
        return Point::ZERO;
    }
    let direction = first.direction();
    let normal = normalize(perpendicular(direction));
    let side = cross(direction, second.midpoint() - first.midpoint());
    let push = if side < 0.0 { -normal } else { normal };
    push * (error * FORCE_DAMPING)
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepulsionOutcome {
    pub offsets: OffsetMap,
    pub iterations: usize,
    pub converged: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct RepulsionSolver {
    pub strength: f64,
    pub min_edge_distance: f64,
    pub max_iterations: usize,
    /// Early-stop level per edge; the pass stops once the summed force drops
    /// below this times the edge count. Configured default is 0.01.
    pub movement_threshold: f64,
    pub cell_size: f64,
}

impl RepulsionSolver {
    pub fn from_config(config: &EdgeRoutingConfig) -> Self {
        Self {
            strength: config.repulsion_strength,
            min_edge_distance: config.min_edge_distance,
            max_iterations: config.max_repulsion_iterations,
            movement_threshold: config.movement_threshold,
            cell_size: config.effective_cell_size(),
        }
    }

    /// Runs the damped separation loop over one chord per edge.
    ///
    /// The grid and its candidate pairs are built once from the incoming
    /// chords. Later passes measure distances on chords translated by the
    /// offsets accumulated so far but never re-bucket them.
    pub fn solve(&self, segments: Vec<EdgeSegment>) -> RepulsionOutcome {
        let edge_count = segments.len();
        let _span = tracing::debug_span!("repulsion_solve", edges = edge_count).entered();

        let grid = SpatialGrid::build(segments, self.cell_size);
        let candidates = candidate_pairs(&grid, self.min_edge_distance);
        let segments = grid.segments();
        let settle_below = self.movement_threshold * edge_count as f64;

        let mut offsets = OffsetMap::new();
        let mut iterations = 0;
        let mut converged = false;
        while iterations < self.max_iterations {
            iterations += 1;
            let mut forces: BTreeMap<EdgeId, Point> = BTreeMap::new();
            for &(a, b) in &candidates {
                let first = segments[a].translated(offset_of(&offsets, segments[a].edge));
                let second = segments[b].translated(offset_of(&offsets, segments[b].edge));
                let distance = chord_distance(&first, &second);
                if distance >= self.min_edge_distance {
                    continue;
                }
                let force = pair_force(&first, &second, distance, self.min_edge_distance);
                if force.is_zero() {
                    continue;
                }
                *forces.entry(second.edge).or_default() += force;
                *forces.entry(first.edge).or_default() += -force;
            }

            let total: f64 = forces.values().map(|force| force.length()).sum();
            for (edge, force) in forces {
                *offsets.entry(edge).or_default() += force * self.strength;
            }
            tracing::trace!(iteration = iterations, total_force = total, "repulsion pass");
            if total < settle_below {
                converged = true;
                break;
            }
        }

        tracing::debug!(
            candidates = candidates.len(),
            iterations,
            converged,
            displaced = offsets.len(),
            "repulsion solved"
        );
        RepulsionOutcome {
            offsets,
            iterations,
            converged,
        }
    }
}

fn offset_of(offsets: &OffsetMap, edge: EdgeId) -> Point {
    offsets.get(&edge).copied().unwrap_or_default()
}
