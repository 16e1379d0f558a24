use crate::ir::{EdgeId, Graph};
use crate::routing::{CURVE_SAMPLES, EdgeRouter, Point, RoutedEdge};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct RouteDump {
    pub anchor_mode: String,
    pub routing_mode: String,
    pub repulsion: bool,
    pub nodes: usize,
    pub edges: Vec<EdgeDump>,
    pub crossings: Vec<[usize; 2]>,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub id: usize,
    pub from: String,
    pub to: String,
    pub kind: String,
    pub source: [f64; 2],
    pub destination: [f64; 2],
    pub offset: [f64; 2],
    pub points: Vec<[f64; 2]>,
    pub svg_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrow: Option<[[f64; 2]; 2]>,
}

fn xy(p: Point) -> [f64; 2] {
    [p.x, p.y]
}

impl RouteDump {
    pub fn from_routes(
        router: &EdgeRouter<'_>,
        routes: &[RoutedEdge],
        crossings: &[(EdgeId, EdgeId)],
    ) -> Self {
        let graph: &Graph = router.graph();
        let config = router.config();
        let edges = routes
            .iter()
            .filter_map(|route| {
                let edge = graph.edge(route.edge)?;
                Some(EdgeDump {
                    id: route.edge.0,
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    kind: route.path.kind().to_string(),
                    source: xy(route.source),
                    destination: xy(route.destination),
                    offset: xy(route.offset),
                    points: route.path.flatten(CURVE_SAMPLES).into_iter().map(xy).collect(),
                    svg_path: route.path.to_svg_path(),
                    arrow: route.arrow.map(|(base, tip)| [xy(base), xy(tip)]),
                })
            })
            .collect();

        RouteDump {
            anchor_mode: format!("{:?}", config.anchor_mode),
            routing_mode: format!("{:?}", config.routing_mode),
            repulsion: config.enable_repulsion,
            nodes: graph.nodes.len(),
            edges,
            crossings: crossings.iter().map(|(a, b)| [a.0, b.0]).collect(),
        }
    }
}

/// Writes the dump as pretty JSON to `path`, or stdout when `None`.
pub fn write_route_dump(path: Option<&Path>, dump: &RouteDump) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, dump)?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, dump)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
