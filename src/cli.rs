use crate::config::{AnchorMode, RoutingMode, load_config};
use crate::ir::Graph;
use crate::route_dump::{RouteDump, write_route_dump};
use crate::routing::EdgeRouter;
use anyhow::Result;
use clap::Parser;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lroute", version, about = "Route the edges of a laid-out diagram scene")]
pub struct Args {
    /// Scene file (.json / .json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Route dump output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Routing config file (JSON or JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Anchor mode override
    #[arg(long = "anchor", value_enum)]
    pub anchor: Option<AnchorMode>,

    /// Routing mode override
    #[arg(long = "routing", value_enum)]
    pub routing: Option<RoutingMode>,

    /// Enable edge repulsion regardless of the config file
    #[arg(long = "repulsion")]
    pub repulsion: bool,

    /// Minimum edge distance override
    #[arg(long = "minEdgeDistance")]
    pub min_edge_distance: Option<f64>,
}

pub fn run() -> Result<()> {
    init_logging();
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(mode) = args.anchor {
        config.anchor_mode = mode;
    }
    if let Some(mode) = args.routing {
        config.routing_mode = mode;
    }
    if args.repulsion {
        config.enable_repulsion = true;
    }
    if let Some(distance) = args.min_edge_distance {
        config.min_edge_distance = distance;
    }
    config.validate()?;

    let graph = load_scene(args.input.as_deref())?;
    tracing::debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "scene loaded"
    );

    let router = EdgeRouter::new(&graph, &config);
    let mut frame = router.frame();
    let routes = router.route_all(&mut frame)?;
    let crossings = router.crossings(frame.edges())?;
    let dump = RouteDump::from_routes(&router, &routes, &crossings);
    write_route_dump(args.output.as_deref(), &dump)
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed when embedded; keep the existing one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok(buf);
        }
        return Ok(std::fs::read_to_string(path)?);
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

pub fn load_scene(path: Option<&Path>) -> Result<Graph> {
    let input = read_input(path)?;
    Graph::parse(&input)
}
