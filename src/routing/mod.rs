//! Edge geometry for laid-out node-link diagrams.
//!
//! Per frame, every edge gets two anchors on its nodes (shifted sideways when
//! it shares its endpoints with siblings), a path between them, and, when
//! repulsion is enabled, an offset computed once across the whole edge set
//! that pushes crowded edges apart.

pub mod anchor;
mod error;
pub mod geometry;
pub mod offset;
pub mod parallel;
pub mod path;
pub mod repulsion;
pub mod spatial;
pub(crate) mod types;

pub use error::{Result, RouteError};
pub use geometry::{Point, Rect};
pub use repulsion::{OffsetMap, RepulsionOutcome, RepulsionSolver};
pub use spatial::{EdgeSegment, SpatialGrid};
pub use types::*;

use std::collections::HashMap;

use crate::config::{AnchorMode, EdgeRoutingConfig, RoutingMode};
use crate::ir::{Edge, EdgeId, Graph, Node};

/// Anchor and routing modes in effect for one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedStrategy {
    pub anchor_mode: AnchorMode,
    pub routing_mode: RoutingMode,
}

/// Per-frame memo for the repulsion pass.
///
/// The solver needs every edge at once, while callers route edges one by one;
/// the context runs it on first demand and serves the cached map until the
/// next [`FrameContext::begin_frame`].
#[derive(Debug, Clone, Default)]
pub struct FrameContext {
    edges: Vec<EdgeId>,
    computed: bool,
    offsets: OffsetMap,
}

impl FrameContext {
    pub fn new(edges: Vec<EdgeId>) -> Self {
        Self {
            edges,
            computed: false,
            offsets: OffsetMap::new(),
        }
    }

    /// Starts a new frame over `edges`, dropping the cached offsets.
    pub fn begin_frame(&mut self, edges: Vec<EdgeId>) {
        self.edges = edges;
        self.computed = false;
        self.offsets.clear();
    }

    pub fn is_computed(&self) -> bool {
        self.computed
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn offsets(&mut self, router: &EdgeRouter<'_>) -> Result<&OffsetMap> {
        if !self.computed {
            self.offsets = router.compute_repulsion_offsets(&self.edges)?;
            self.computed = true;
        }
        Ok(&self.offsets)
    }

    pub fn offset_for(&mut self, router: &EdgeRouter<'_>, edge: EdgeId) -> Result<Point> {
        Ok(self.offsets(router)?.get(&edge).copied().unwrap_or_default())
    }
}

pub struct EdgeRouter<'a> {
    graph: &'a Graph,
    config: &'a EdgeRoutingConfig,
    parallel_groups: HashMap<(String, String), Vec<EdgeId>>,
}

impl<'a> EdgeRouter<'a> {
    pub fn new(graph: &'a Graph, config: &'a EdgeRoutingConfig) -> Self {
        Self {
            graph,
            config,
            parallel_groups: parallel::build_parallel_groups(&graph.edges),
        }
    }

    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    pub fn config(&self) -> &'a EdgeRoutingConfig {
        self.config
    }

    /// A fresh frame context covering every edge of the scene.
    pub fn frame(&self) -> FrameContext {
        FrameContext::new(self.graph.edge_ids().collect())
    }

    fn edge(&self, id: EdgeId) -> Result<&'a Edge> {
        self.graph
            .edge(id)
            .ok_or(RouteError::UnknownEdge { edge: id })
    }

    fn node(&self, id: EdgeId, node_id: &str) -> Result<&'a Node> {
        self.graph.node(node_id).ok_or_else(|| RouteError::MissingNode {
            edge: id,
            node: node_id.to_string(),
        })
    }

    fn endpoints(&self, id: EdgeId) -> Result<(&'a Node, &'a Node)> {
        let edge = self.edge(id)?;
        Ok((self.node(id, &edge.from)?, self.node(id, &edge.to)?))
    }

    /// The edge's named strategy layered over the frame defaults.
    pub fn strategy_for(&self, id: EdgeId) -> Result<ResolvedStrategy> {
        let edge = self.edge(id)?;
        let mut resolved = ResolvedStrategy {
            anchor_mode: self.config.anchor_mode,
            routing_mode: self.config.routing_mode,
        };
        if let Some(name) = edge.strategy.as_deref() {
            let strategy =
                self.graph
                    .strategies
                    .get(name)
                    .ok_or_else(|| RouteError::UnknownStrategy {
                        edge: id,
                        strategy: name.to_string(),
                    })?;
            if let Some(mode) = strategy.anchor_mode {
                resolved.anchor_mode = mode;
            }
            if let Some(mode) = strategy.routing_mode {
                resolved.routing_mode = mode;
            }
        }
        Ok(resolved)
    }

    pub fn parallel_index(&self, id: EdgeId) -> Result<f64> {
        let edge = self.edge(id)?;
        Ok(parallel::parallel_index(
            &self.parallel_groups,
            id,
            edge,
            self.config.parallel_centering,
        ))
    }

    pub fn resolve_source_anchor(&self, id: EdgeId, other_center: Point, parallel_index: f64) -> Result<Point> {
        let (source, _) = self.endpoints(id)?;
        let mode = self.strategy_for(id)?.anchor_mode;
        let anchor = anchor::resolve_anchor(&source.rect(), other_center, mode);
        Ok(parallel::displace_anchor(
            anchor,
            source.center(),
            other_center,
            parallel_index,
            self.config.min_edge_distance,
        ))
    }

    pub fn resolve_destination_anchor(
        &self,
        id: EdgeId,
        other_center: Point,
        parallel_index: f64,
    ) -> Result<Point> {
        let (_, destination) = self.endpoints(id)?;
        let mode = self.strategy_for(id)?.anchor_mode;
        let anchor = anchor::resolve_anchor(&destination.rect(), other_center, mode);
        Ok(parallel::displace_anchor(
            anchor,
            other_center,
            destination.center(),
            parallel_index,
            self.config.min_edge_distance,
        ))
    }

    pub fn build_path(&self, source: Point, destination: Point, id: EdgeId) -> Result<EdgePath> {
        let mode = self.strategy_for(id)?.routing_mode;
        Ok(path::build_path(source, destination, mode))
    }

    pub fn build_self_loop_path(&self, id: EdgeId, loop_padding: f64, arrow_length: f64) -> Result<SelfLoopPath> {
        let edge = self.edge(id)?;
        let node = self.node(id, &edge.from)?;
        Ok(path::self_loop_path(&node.rect(), loop_padding, arrow_length))
    }

    /// Both anchors of a non-loop edge, parallel distribution included.
    pub fn anchors(&self, id: EdgeId) -> Result<(Point, Point)> {
        let (source, destination) = self.endpoints(id)?;
        let index = self.parallel_index(id)?;
        Ok((
            self.resolve_source_anchor(id, destination.center(), index)?,
            self.resolve_destination_anchor(id, source.center(), index)?,
        ))
    }

    /// Anchor-to-anchor chord of every non-loop edge in `edges`.
    pub fn segments(&self, edges: &[EdgeId]) -> Result<Vec<EdgeSegment>> {
        let mut segments = Vec::with_capacity(edges.len());
        for &id in edges {
            if self.edge(id)?.is_self_loop() {
                continue;
            }
            let (start, end) = self.anchors(id)?;
            segments.push(EdgeSegment::new(id, 0, start, end));
        }
        Ok(segments)
    }

    pub fn compute_repulsion_offsets(&self, edges: &[EdgeId]) -> Result<OffsetMap> {
        if !self.config.enable_repulsion {
            return Ok(OffsetMap::new());
        }
        let segments = self.segments(edges)?;
        Ok(RepulsionSolver::from_config(self.config).solve(segments).offsets)
    }

    pub fn apply_repulsion(path: &EdgePath, offset: Point, mode: RoutingMode) -> EdgePath {
        offset::apply_repulsion(path, offset, mode)
    }

    /// Pairs of edges whose chords cross.
    pub fn crossings(&self, edges: &[EdgeId]) -> Result<Vec<(EdgeId, EdgeId)>> {
        let grid = SpatialGrid::build(self.segments(edges)?, self.config.effective_cell_size());
        let segments = grid.segments();
        Ok(repulsion::detect_intersections(&grid)
            .into_iter()
            .map(|(a, b)| (segments[a].edge, segments[b].edge))
            .collect())
    }

    pub fn route_edge(&self, id: EdgeId, frame: &mut FrameContext) -> Result<RoutedEdge> {
        let edge = self.edge(id)?;
        let strategy = self.strategy_for(id)?;
        if edge.is_self_loop() {
            let looped =
                self.build_self_loop_path(id, self.config.loop_padding, self.config.arrow_length)?;
            return Ok(RoutedEdge {
                edge: id,
                source: looped.curve.start,
                destination: looped.curve.end,
                path: looped.path(),
                offset: Point::ZERO,
                arrow: Some((looped.arrow_base, looped.arrow_tip)),
            });
        }

        let (source, destination) = self.anchors(id)?;
        let raw = path::build_path(source, destination, strategy.routing_mode);
        let offset = if self.config.enable_repulsion {
            frame.offset_for(self, id)?
        } else {
            Point::ZERO
        };
        tracing::trace!(edge = %id, ?strategy, ?offset, "edge routed");
        Ok(RoutedEdge {
            edge: id,
            source,
            destination,
            path: offset::apply_repulsion(&raw, offset, strategy.routing_mode),
            offset,
            arrow: None,
        })
    }

    pub fn route_all(&self, frame: &mut FrameContext) -> Result<Vec<RoutedEdge>> {
        let _span = tracing::debug_span!("route_all", edges = self.graph.edges.len()).entered();
        self.graph
            .edge_ids()
            .map(|id| self.route_edge(id, frame))
            .collect()
    }
}
