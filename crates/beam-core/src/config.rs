// Page configuration: which sections the light visits, how scrolling feels,
// and the waypoint graph. Every field has a default, so an empty JSON object
// is a valid config.

use serde::Deserialize;

use crate::constants::{DEFAULT_BRANCH_X, DEFAULT_SECTIONS, LIGHT_BASE_OFFSET_FRACTION};
use crate::error::ConfigError;
use crate::path::{CoordinateSpace, GraphSpec};
use crate::scroll::ScrollConfig;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BeamConfig {
    /// Element ids, top to bottom.
    pub sections: Vec<String>,
    /// Where the illumination cursor starts, as a fraction of viewport height.
    pub light_offset: f32,
    pub scroll: ScrollConfig,
    pub space: CoordinateSpace,
    /// Explicit waypoint graph. When absent a spine through `sections` is used.
    pub graph: Option<GraphSpec>,
    /// Per-frame detection logging.
    pub debug: bool,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            sections: DEFAULT_SECTIONS.iter().map(|s| s.to_string()).collect(),
            light_offset: LIGHT_BASE_OFFSET_FRACTION,
            scroll: ScrollConfig::default(),
            space: CoordinateSpace::default(),
            graph: None,
            debug: false,
        }
    }
}

impl BeamConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_sections<S: Into<String>>(mut self, sections: impl IntoIterator<Item = S>) -> Self {
        self.sections = sections.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_graph(mut self, graph: GraphSpec) -> Self {
        self.graph = Some(graph);
        self
    }

    /// The configured graph, or the default spine.
    pub fn graph_spec(&self) -> GraphSpec {
        match &self.graph {
            Some(g) => g.clone(),
            None => GraphSpec::spine(&self.sections, DEFAULT_BRANCH_X),
        }
    }
}
