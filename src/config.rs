use serde::{Deserialize, Serialize};
use std::path::Path;

/// Grid cell edge length used when none (or a non-positive one) is configured.
pub const DEFAULT_CELL_SIZE: f64 = 50.0;

/// Rule for picking where an edge touches its node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum AnchorMode {
    Center,
    #[default]
    Cardinal,
    Octagonal,
    Dynamic,
}

/// Shape family used to connect two anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum RoutingMode {
    Direct,
    Orthogonal,
    #[default]
    Bezier,
    /// Placeholder; routes exactly like [`RoutingMode::Bezier`].
    Bundling,
}

impl RoutingMode {
    pub fn is_curved(self) -> bool {
        matches!(self, RoutingMode::Bezier | RoutingMode::Bundling)
    }
}

/// How slots of parallel edges are centered around the unshifted anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParallelCentering {
    /// `slot - floor((n - 1) / 2)`. Even counts lean to one side.
    Legacy,
    /// `slot - (n - 1) / 2`. Even counts get half-integer slots.
    #[default]
    Symmetric,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EdgeRoutingConfig {
    pub anchor_mode: AnchorMode,
    pub routing_mode: RoutingMode,
    pub enable_repulsion: bool,
    /// Scale applied to every pass's forces. Expected in [0, 1] but not clamped.
    pub repulsion_strength: f64,
    pub min_edge_distance: f64,
    pub max_repulsion_iterations: usize,
    /// Per-edge force total below which the solver stops early. Defaults to
    /// 0.01, well above the geometric `EPSILON` of 1e-6.
    pub movement_threshold: f64,
    pub cell_size: f64,
    pub loop_padding: f64,
    pub arrow_length: f64,
    pub parallel_centering: ParallelCentering,
}

impl Default for EdgeRoutingConfig {
    fn default() -> Self {
        Self {
            anchor_mode: AnchorMode::default(),
            routing_mode: RoutingMode::default(),
            enable_repulsion: false,
            repulsion_strength: 0.5,
            min_edge_distance: 20.0,
            max_repulsion_iterations: 10,
            movement_threshold: 0.01,
            cell_size: DEFAULT_CELL_SIZE,
            loop_padding: 20.0,
            arrow_length: 10.0,
            parallel_centering: ParallelCentering::default(),
        }
    }
}

impl EdgeRoutingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let distances = [
            ("minEdgeDistance", self.min_edge_distance),
            ("movementThreshold", self.movement_threshold),
            ("loopPadding", self.loop_padding),
            ("arrowLength", self.arrow_length),
        ];
        for (field, value) in distances {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if !self.repulsion_strength.is_finite() {
            return Err(ConfigError::NotFinite {
                field: "repulsionStrength",
                value: self.repulsion_strength,
            });
        }
        if !self.cell_size.is_finite() {
            return Err(ConfigError::NotFinite {
                field: "cellSize",
                value: self.cell_size,
            });
        }
        Ok(())
    }

    pub fn effective_cell_size(&self) -> f64 {
        if self.cell_size > 0.0 {
            self.cell_size
        } else {
            DEFAULT_CELL_SIZE
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be finite (got {value})")]
    NotFinite { field: &'static str, value: f64 },
}

/// Named per-edge override of the frame defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EdgeStrategy {
    pub anchor_mode: Option<AnchorMode>,
    pub routing_mode: Option<RoutingMode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    anchor_mode: Option<AnchorMode>,
    routing_mode: Option<RoutingMode>,
    parallel_centering: Option<ParallelCentering>,
    repulsion: Option<RepulsionConfigFile>,
    self_loop: Option<SelfLoopConfigFile>,
    cell_size: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepulsionConfigFile {
    enabled: Option<bool>,
    strength: Option<f64>,
    min_edge_distance: Option<f64>,
    max_iterations: Option<usize>,
    movement_threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelfLoopConfigFile {
    padding: Option<f64>,
    arrow_length: Option<f64>,
}

/// Parses JSON, falling back to JSON5 for hand-written files with comments or
/// trailing commas.
pub(crate) fn parse_lenient<T: serde::de::DeserializeOwned>(contents: &str) -> anyhow::Result<T> {
    match serde_json::from_str(contents) {
        Ok(value) => Ok(value),
        Err(json_err) => json5::from_str(contents)
            .map_err(|json5_err| anyhow::anyhow!("invalid JSON ({json_err}) or JSON5 ({json5_err})")),
    }
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<EdgeRoutingConfig> {
    let mut config = EdgeRoutingConfig::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = parse_lenient(&contents)?;

    if let Some(v) = parsed.anchor_mode {
        config.anchor_mode = v;
    }
    if let Some(v) = parsed.routing_mode {
        config.routing_mode = v;
    }
    if let Some(v) = parsed.parallel_centering {
        config.parallel_centering = v;
    }
    if let Some(v) = parsed.cell_size {
        config.cell_size = v;
    }
    if let Some(repulsion) = parsed.repulsion {
        if let Some(v) = repulsion.enabled {
            config.enable_repulsion = v;
        }
        if let Some(v) = repulsion.strength {
            config.repulsion_strength = v;
        }
        if let Some(v) = repulsion.min_edge_distance {
            config.min_edge_distance = v;
        }
        if let Some(v) = repulsion.max_iterations {
            config.max_repulsion_iterations = v;
        }
        if let Some(v) = repulsion.movement_threshold {
            config.movement_threshold = v;
        }
    }
    if let Some(self_loop) = parsed.self_loop {
        if let Some(v) = self_loop.padding {
            config.loop_padding = v;
        }
        if let Some(v) = self_loop.arrow_length {
            config.arrow_length = v;
        }
    }

    config.validate()?;
    Ok(config)
}
