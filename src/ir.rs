use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{EdgeStrategy, parse_lenient};
use crate::routing::geometry::{Point, Rect};

/// Position of an edge in [`Graph::edges`]. Identity is positional, so two
/// edges with the same endpoints are still distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub usize);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Node {
    pub fn new(id: &str, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: id.to_string(),
            x,
            y,
            width,
            height,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> Point {
        self.rect().center()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    /// Name of an entry in [`Graph::strategies`] overriding the frame defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
}

impl Edge {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            strategy: None,
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

/// Read-only scene handed to the router: laid-out nodes and the edges between them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    #[serde(with = "node_list")]
    pub nodes: BTreeMap<String, Node>,
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub strategies: BTreeMap<String, EdgeStrategy>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a scene file, accepting JSON5 as well as strict JSON.
    pub fn parse(input: &str) -> anyhow::Result<Self> {
        if input.trim().is_empty() {
            return Err(anyhow::anyhow!("Scene input is empty"));
        }
        parse_lenient(input)
    }

    pub fn add_node(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn add_edge(&mut self, from: &str, to: &str) -> EdgeId {
        self.edges.push(Edge::new(from, to));
        EdgeId(self.edges.len() - 1)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0)
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).map(EdgeId)
    }

    pub fn outgoing<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = EdgeId> + 'a {
        self.edges
            .iter()
            .enumerate()
            .filter(move |(_, edge)| edge.from == node_id)
            .map(|(idx, _)| EdgeId(idx))
    }

    pub fn incoming<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = EdgeId> + 'a {
        self.edges
            .iter()
            .enumerate()
            .filter(move |(_, edge)| edge.to == node_id)
            .map(|(idx, _)| EdgeId(idx))
    }
}

/// Scene files list nodes as an array; the graph keys them by id.
mod node_list {
    use super::Node;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        nodes: &BTreeMap<String, Node>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let list: Vec<&Node> = nodes.values().collect();
        list.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, Node>, D::Error> {
        let list = Vec::<Node>::deserialize(deserializer)?;
        let mut nodes = BTreeMap::new();
        for node in list {
            if nodes.contains_key(&node.id) {
                return Err(D::Error::custom(format!("duplicate node id `{}`", node.id)));
            }
            nodes.insert(node.id.clone(), node);
        }
        Ok(nodes)
    }
}
