use std::collections::{HashMap, HashSet};

use crate::ir::EdgeId;

use super::geometry::{Point, Rect, lerp, normalize};

/// Straight chord standing in for an edge's rendered geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSegment {
    pub edge: EdgeId,
    pub index: usize,
    pub start: Point,
    pub end: Point,
}

impl EdgeSegment {
    pub fn new(edge: EdgeId, index: usize, start: Point, end: Point) -> Self {
        Self {
            edge,
            index,
            start,
            end,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::spanning(self.start, self.end)
    }

    pub fn midpoint(&self) -> Point {
        lerp(self.start, self.end, 0.5)
    }

    /// Unit direction, zero for a degenerate segment.
    pub fn direction(&self) -> Point {
        normalize(self.end - self.start)
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    pub fn translated(&self, offset: Point) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
            ..*self
        }
    }
}

/// (row, col) of a grid cell.
pub type CellKey = (i64, i64);

/// Uniform grid bucketing segments by every cell their bounding box touches.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f64,
    cells: HashMap<CellKey, Vec<usize>>,
    segments: Vec<EdgeSegment>,
}

impl SpatialGrid {
    pub fn build(segments: Vec<EdgeSegment>, cell_size: f64) -> Self {
        let mut grid = Self {
            cell_size,
            cells: HashMap::new(),
            segments,
        };
        for idx in 0..grid.segments.len() {
            let (rows, cols) = grid.cell_range(&grid.segments[idx].bounds());
            for row in rows.0..=rows.1 {
                for col in cols.0..=cols.1 {
                    grid.cells.entry((row, col)).or_default().push(idx);
                }
            }
        }
        tracing::trace!(
            segments = grid.segments.len(),
            cells = grid.cells.len(),
            cell_size,
            "spatial grid built"
        );
        grid
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn segments(&self) -> &[EdgeSegment] {
        &self.segments
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cell_of(&self, p: Point) -> CellKey {
        (
            (p.y / self.cell_size).floor() as i64,
            (p.x / self.cell_size).floor() as i64,
        )
    }

    pub fn cell(&self, key: CellKey) -> &[usize] {
        self.cells.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    fn cell_range(&self, bounds: &Rect) -> ((i64, i64), (i64, i64)) {
        let (row0, col0) = self.cell_of(Point::new(bounds.x, bounds.y));
        let (row1, col1) = self.cell_of(Point::new(bounds.right(), bounds.bottom()));
        ((row0, row1), (col0, col1))
    }

    /// Indices of segments in the query's cells plus a one-cell ring around
    /// them, deduplicated and excluding `segment_idx` itself. Sorted ascending.
    pub fn query(&self, segment_idx: usize) -> Vec<usize> {
        self.query_ring(segment_idx, 1)
    }

    /// Like [`SpatialGrid::query`], with the ring widened until it covers
    /// everything within `reach` of the segment's bounds.
    pub fn query_within(&self, segment_idx: usize, reach: f64) -> Vec<usize> {
        self.query_ring(segment_idx, self.ring_for(reach))
    }

    /// Cells of ring needed to cover `reach`; never less than one.
    pub fn ring_for(&self, reach: f64) -> i64 {
        if !reach.is_finite() || reach <= self.cell_size {
            return 1;
        }
        (reach / self.cell_size).ceil() as i64
    }

    fn query_ring(&self, segment_idx: usize, ring: i64) -> Vec<usize> {
        let Some(segment) = self.segments.get(segment_idx) else {
            return Vec::new();
        };
        let (rows, cols) = self.cell_range(&segment.bounds());
        let mut seen = HashSet::new();
        for row in rows.0 - ring..=rows.1 + ring {
            for col in cols.0 - ring..=cols.1 + ring {
                for &idx in self.cell((row, col)) {
                    if idx != segment_idx {
                        seen.insert(idx);
                    }
                }
            }
        }
        let mut found: Vec<usize> = seen.into_iter().collect();
        found.sort_unstable();
        found
    }
}
