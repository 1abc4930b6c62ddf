// Declarative waypoint graph.
//
// The graph is configuration: authored once (in code or JSON), validated at
// setup, immutable afterwards. Validation is the only place a malformed
// reference can surface; per-frame code indexes resolved edges directly.

use fnv::{FnvHashMap, FnvHashSet};
use glam::Vec2;
use serde::Deserialize;

use crate::error::{ConfigError, GraphError};

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl From<Point> for Vec2 {
    fn from(p: Point) -> Self {
        Vec2::new(p.x, p.y)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub x: f32,
    pub y: f32,
    /// Global progress at which the beam reaches this waypoint.
    pub activation_threshold: f32,
}

impl Node {
    pub fn new(id: &str, x: f32, y: f32, activation_threshold: f32) -> Self {
        Self {
            id: id.to_string(),
            x,
            y,
            activation_threshold,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    #[default]
    Straight,
    Curve,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    #[serde(alias = "fromNodeId")]
    pub from: String,
    #[serde(alias = "toNodeId")]
    pub to: String,
    #[serde(default)]
    pub kind: EdgeKind,
    #[serde(default)]
    pub curve_control: Option<Point>,
    #[serde(default)]
    pub activation_start: Option<f32>,
    #[serde(default)]
    pub activation_end: Option<f32>,
}

impl Edge {
    pub fn straight(id: &str, from: &str, to: &str) -> Self {
        Self {
            id: id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            kind: EdgeKind::Straight,
            curve_control: None,
            activation_start: None,
            activation_end: None,
        }
    }

    pub fn curve(id: &str, from: &str, to: &str, control: Vec2) -> Self {
        Self {
            kind: EdgeKind::Curve,
            curve_control: Some(Point {
                x: control.x,
                y: control.y,
            }),
            ..Self::straight(id, from, to)
        }
    }

    pub fn with_window(mut self, start: f32, end: f32) -> Self {
        self.activation_start = Some(start);
        self.activation_end = Some(end);
        self
    }
}

/// Unvalidated graph as it appears in a config file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphSpec {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl GraphSpec {
    /// Central spine through one waypoint per section, with a curved branch
    /// out to alternating sides at each stop. Coordinates are centered px
    /// offsets for x and fractions of the path height for y.
    pub fn spine<S: AsRef<str>>(sections: &[S], branch_x: f32) -> Self {
        let n = sections.len();
        let mut nodes = vec![Node::new("start", 0.0, 0.0, 0.0)];
        let mut edges = Vec::new();
        let mut prev = "start".to_string();
        for (i, s) in sections.iter().enumerate() {
            let s = s.as_ref();
            let t = (i + 1) as f32 / (n + 1) as f32;
            let stop = format!("{}-stop", s);
            let branch = format!("{}-branch", s);
            let side = if i % 2 == 0 { -1.0 } else { 1.0 };
            nodes.push(Node::new(&stop, 0.0, t, t));
            nodes.push(Node::new(&branch, side * branch_x, t + 0.04, (t + 0.04).min(1.0)));
            edges.push(Edge::straight(&format!("{}-spine", s), &prev, &stop));
            edges.push(Edge::curve(
                &format!("{}-arm", s),
                &stop,
                &branch,
                Vec2::new(side * branch_x * 0.5, t),
            ));
            prev = stop;
        }
        nodes.push(Node::new("end", 0.0, 1.0, 1.0));
        edges.push(Edge::straight("tail", &prev, "end"));
        Self { nodes, edges }
    }
}

/// Edge with endpoints resolved to node indices and its activation window
/// filled in.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedEdge {
    pub id: String,
    pub from: usize,
    pub to: usize,
    pub kind: EdgeKind,
    /// Quadratic control point in graph space; `None` for straight edges.
    pub control: Option<Vec2>,
    pub activation_start: f32,
    pub activation_end: f32,
}

impl ResolvedEdge {
    pub fn illumination(&self, progress: f32) -> f32 {
        illumination_fraction(self.activation_start, self.activation_end, progress)
    }
}

/// 0 before `start`, 1 from `end` on, linear in between. A zero-width window
/// is a step at `start`.
#[inline]
pub fn illumination_fraction(start: f32, end: f32, progress: f32) -> f32 {
    if progress < start {
        return 0.0;
    }
    if progress >= end {
        return 1.0;
    }
    let span = end - start;
    if span <= f32::EPSILON {
        return 1.0;
    }
    ((progress - start) / span).clamp(0.0, 1.0)
}

#[derive(Clone, Debug, PartialEq)]
pub struct PathGraph {
    nodes: Vec<Node>,
    edges: Vec<ResolvedEdge>,
}

fn check_unit(owner: &str, value: f32) -> Result<f32, GraphError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(GraphError::ThresholdOutOfRange {
            owner: owner.to_string(),
            value,
        })
    }
}

impl PathGraph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, GraphError> {
        let mut index: FnvHashMap<&str, usize> = FnvHashMap::default();
        for (i, n) in nodes.iter().enumerate() {
            if index.insert(n.id.as_str(), i).is_some() {
                return Err(GraphError::DuplicateNode(n.id.clone()));
            }
            if !(n.x.is_finite() && n.y.is_finite()) {
                return Err(GraphError::NonFiniteCoordinate(n.id.clone()));
            }
            check_unit(&n.id, n.activation_threshold)?;
        }

        let mut seen_edges: FnvHashSet<&str> = FnvHashSet::default();
        let mut resolved = Vec::with_capacity(edges.len());
        for e in &edges {
            if !seen_edges.insert(e.id.as_str()) {
                return Err(GraphError::DuplicateEdge(e.id.clone()));
            }
            let lookup = |node: &str| {
                index.get(node).copied().ok_or_else(|| GraphError::UnknownNode {
                    edge: e.id.clone(),
                    node: node.to_string(),
                })
            };
            let from = lookup(&e.from)?;
            let to = lookup(&e.to)?;
            let mut start = check_unit(&e.id, e.activation_start.unwrap_or(nodes[from].activation_threshold))?;
            let mut end = check_unit(&e.id, e.activation_end.unwrap_or(nodes[to].activation_threshold))?;
            // Back-edges of a cycle inherit a descending window from their
            // endpoints; only an authored bound can make it an error.
            let authored = e.activation_start.is_some() || e.activation_end.is_some();
            if start > end && !authored {
                std::mem::swap(&mut start, &mut end);
            }
            if start > end {
                return Err(GraphError::InvertedWindow {
                    edge: e.id.clone(),
                    start,
                    end,
                });
            }
            let control = match e.kind {
                EdgeKind::Straight => None,
                EdgeKind::Curve => Some(match e.curve_control {
                    Some(c) => Vec2::from(c),
                    // Elbow: leave the start vertically, arrive horizontally.
                    None => Vec2::new(nodes[from].x, nodes[to].y),
                }),
            };
            if let Some(c) = control {
                if !c.is_finite() {
                    return Err(GraphError::NonFiniteCoordinate(e.id.clone()));
                }
            }
            resolved.push(ResolvedEdge {
                id: e.id.clone(),
                from,
                to,
                kind: e.kind,
                control,
                activation_start: start,
                activation_end: end,
            });
        }

        log::debug!("[path] graph ok: {} nodes, {} edges", nodes.len(), resolved.len());
        Ok(Self {
            nodes,
            edges: resolved,
        })
    }

    pub fn from_spec(spec: GraphSpec) -> Result<Self, GraphError> {
        Self::new(spec.nodes, spec.edges)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let spec: GraphSpec = serde_json::from_str(json)?;
        Ok(Self::from_spec(spec)?)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[ResolvedEdge] {
        &self.edges
    }

    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    pub fn find_node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn find_edge(&self, id: &str) -> Option<&ResolvedEdge> {
        self.edges.iter().find(|e| e.id == id)
    }
}
