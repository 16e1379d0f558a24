#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod route_dump;
pub mod routing;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{
    AnchorMode, EdgeRoutingConfig, EdgeStrategy, ParallelCentering, RoutingMode, load_config,
};
pub use ir::{Edge, EdgeId, Graph, Node};
pub use route_dump::{RouteDump, write_route_dump};
pub use routing::{
    EdgePath, EdgeRouter, FrameContext, OffsetMap, Point, Rect, RouteError, RoutedEdge,
    SelfLoopPath,
};
