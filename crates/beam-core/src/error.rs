// Configuration and initialization errors.
//
// Only setup can fail. Per-frame work never returns these; missing sections
// and zero-width activation windows are handled in place.

use thiserror::Error;

/// Problems found while validating a waypoint graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("duplicate node id `{0}`")]
    DuplicateNode(String),
    #[error("duplicate edge id `{0}`")]
    DuplicateEdge(String),
    #[error("edge `{edge}` references undeclared node `{node}`")]
    UnknownNode { edge: String, node: String },
    #[error("`{owner}` has activation value {value} outside [0, 1]")]
    ThresholdOutOfRange { owner: String, value: f32 },
    #[error("node `{0}` has a non-finite coordinate")]
    NonFiniteCoordinate(String),
    #[error("edge `{edge}` activation window is inverted ({start} > {end})")]
    InvertedWindow { edge: String, start: f32, end: f32 },
}

/// Anything that stops the runtime from being constructed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("duplicate section id `{0}`")]
    DuplicateSection(String),
    #[error("empty section id at position {0}")]
    EmptySection(usize),
    #[error("base offset fraction {0} must be finite and non-negative")]
    InvalidLightOffset(f32),
    #[error("invalid path graph: {0}")]
    Graph(#[from] GraphError),
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The smoothing backend could not be brought up; the engine falls back to
/// raw scroll tracking.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    #[error("smooth scrolling is not supported by this viewport")]
    Unsupported,
    #[error("smoothing duration {0}s must be finite and positive")]
    InvalidDuration(f32),
    #[error("input multiplier {0} must be finite and positive")]
    InvalidMultiplier(f32),
}
