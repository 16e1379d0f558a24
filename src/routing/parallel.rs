use std::collections::HashMap;

use crate::config::ParallelCentering;
use crate::ir::{Edge, EdgeId};

use super::geometry::{Point, normalize, perpendicular};

/// Ordered (source, destination) key; `A -> B` and `B -> A` are different groups.
pub(super) fn edge_pair_key(edge: &Edge) -> (String, String) {
    (edge.from.clone(), edge.to.clone())
}

/// Groups edge ids by ordered endpoint pair, each group in edge-list order.
pub(super) fn build_parallel_groups(edges: &[Edge]) -> HashMap<(String, String), Vec<EdgeId>> {
    let mut groups: HashMap<(String, String), Vec<EdgeId>> = HashMap::new();
    for (idx, edge) in edges.iter().enumerate() {
        groups.entry(edge_pair_key(edge)).or_default().push(EdgeId(idx));
    }
    groups
}

/// Centered slot of an edge among its parallel siblings. `0.0` means the edge
/// keeps the unshifted anchor.
pub fn centered_index(slot: usize, count: usize, centering: ParallelCentering) -> f64 {
    if count <= 1 {
        return 0.0;
    }
    match centering {
        ParallelCentering::Legacy => slot as f64 - ((count - 1) / 2) as f64,
        ParallelCentering::Symmetric => slot as f64 - (count - 1) as f64 / 2.0,
    }
}

pub(super) fn parallel_index(
    groups: &HashMap<(String, String), Vec<EdgeId>>,
    edge_id: EdgeId,
    edge: &Edge,
    centering: ParallelCentering,
) -> f64 {
    let Some(group) = groups.get(&edge_pair_key(edge)) else {
        return 0.0;
    };
    match group.iter().position(|id| *id == edge_id) {
        Some(slot) => centered_index(slot, group.len(), centering),
        None => 0.0,
    }
}

/// Shifts `anchor` sideways for a parallel slot. The side is taken from the
/// edge's own `from -> to` direction so both ends of a slot move together.
pub fn displace_anchor(
    anchor: Point,
    from: Point,
    to: Point,
    index: f64,
    spacing: f64,
) -> Point {
    if index == 0.0 {
        return anchor;
    }
    let side = normalize(perpendicular(to - from));
    if side.is_zero() {
        return anchor;
    }
    anchor + side * (index * spacing)
}
