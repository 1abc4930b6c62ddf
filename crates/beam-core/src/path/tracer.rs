// Base and illuminated path geometry.
//
// Base paths (the dim rail) depend only on the graph and the projection and
// are cached. Illuminated paths are rebuilt every frame into a reused buffer.

use std::fmt::Write;

use glam::Vec2;

use super::graph::{EdgeKind, Node, PathGraph, ResolvedEdge};
use super::projection::Projection;
use crate::constants::{CURVE_FLATTEN_STEPS, PATH_DECIMALS};

/// One drawable piece of path, already projected to px.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Segment {
    pub edge_id: String,
    pub kind: EdgeKind,
    pub from: Vec2,
    /// Quadratic control point for curves.
    pub control: Option<Vec2>,
    pub to: Vec2,
    /// Share of the full edge this segment covers, in [0, 1].
    pub fraction: f32,
    /// SVG path data, e.g. `M 10.00 0.00 Q 10.00 50.00 60.00 50.00`.
    pub d: String,
}

impl Segment {
    /// Arc length in px. Exact for lines, flattened for curves.
    pub fn length(&self) -> f32 {
        match self.control {
            None => self.from.distance(self.to),
            Some(c) => {
                let mut len = 0.0;
                let mut prev = self.from;
                for i in 1..=CURVE_FLATTEN_STEPS {
                    let t = i as f32 / CURVE_FLATTEN_STEPS as f32;
                    let p = quad_point(self.from, c, self.to, t);
                    len += prev.distance(p);
                    prev = p;
                }
                len
            }
        }
    }
}

#[inline]
fn quad_point(p0: Vec2, p1: Vec2, p2: Vec2, t: f32) -> Vec2 {
    p0.lerp(p1, t).lerp(p1.lerp(p2, t), t)
}

/// Control point and end point of the quadratic's `[0, t]` piece
/// (de Casteljau split). The endpoint travels along the curve itself.
#[inline]
pub fn split_quad(p0: Vec2, p1: Vec2, p2: Vec2, t: f32) -> (Vec2, Vec2) {
    let c = p0.lerp(p1, t);
    (c, c.lerp(p1.lerp(p2, t), t))
}

fn write_d(d: &mut String, from: Vec2, control: Option<Vec2>, to: Vec2) {
    d.clear();
    _ = write!(d, "M {:.p$} {:.p$}", from.x, from.y, p = PATH_DECIMALS);
    _ = match control {
        Some(c) => write!(
            d,
            " Q {:.p$} {:.p$} {:.p$} {:.p$}",
            c.x,
            c.y,
            to.x,
            to.y,
            p = PATH_DECIMALS
        ),
        None => write!(d, " L {:.p$} {:.p$}", to.x, to.y, p = PATH_DECIMALS),
    };
}

/// Fill `seg` with the first `fraction` of `edge`.
fn fill_segment(seg: &mut Segment, graph: &PathGraph, edge: &ResolvedEdge, proj: &Projection, fraction: f32) {
    let p0 = proj.project(graph.node(edge.from).position());
    let p2 = proj.project(graph.node(edge.to).position());
    let (control, to) = match edge.control {
        None => (None, p0.lerp(p2, fraction)),
        Some(c) => {
            let p1 = proj.project(c);
            let (c, end) = split_quad(p0, p1, p2, fraction);
            (Some(c), end)
        }
    };
    if seg.edge_id != edge.id {
        seg.edge_id.clear();
        seg.edge_id.push_str(&edge.id);
    }
    seg.kind = edge.kind;
    seg.from = p0;
    seg.control = control;
    seg.to = to;
    seg.fraction = fraction;
    write_d(&mut seg.d, p0, control, to);
}

/// One full segment per edge, in declaration order. Pure.
pub fn compute_base_paths(graph: &PathGraph, projection: &Projection) -> Vec<Segment> {
    graph
        .edges()
        .iter()
        .map(|e| {
            let mut seg = Segment::default();
            fill_segment(&mut seg, graph, e, projection, 1.0);
            seg
        })
        .collect()
}

/// Lit portion of every edge whose window has opened. Edges not reached yet
/// are left out entirely. Pure.
pub fn compute_illuminated_paths(graph: &PathGraph, projection: &Projection, progress: f32) -> Vec<Segment> {
    let mut out = Vec::new();
    illuminate_into(&mut out, graph, projection, progress);
    out
}

/// Rebuild `out` in place, reusing its segments and their strings. Returns
/// the number of lit segments; `out` is truncated to that length.
fn illuminate_into(out: &mut Vec<Segment>, graph: &PathGraph, projection: &Projection, progress: f32) -> usize {
    let mut n = 0;
    for edge in graph.edges() {
        if progress < edge.activation_start {
            continue;
        }
        let fraction = edge.illumination(progress);
        if n == out.len() {
            out.push(Segment::default());
        }
        fill_segment(&mut out[n], graph, edge, projection, fraction);
        n += 1;
    }
    out.truncate(n);
    n
}

/// Owns a validated graph plus the cached base paths and the per-frame lit
/// buffer.
#[derive(Debug)]
pub struct PathTracer {
    graph: PathGraph,
    base: Vec<Segment>,
    base_for: Option<Projection>,
    lit: Vec<Segment>,
    reached: Vec<Vec2>,
}

impl PathTracer {
    pub fn new(graph: PathGraph) -> Self {
        let cap = graph.edges().len();
        Self {
            graph,
            base: Vec::with_capacity(cap),
            base_for: None,
            lit: Vec::with_capacity(cap),
            reached: Vec::new(),
        }
    }

    pub fn graph(&self) -> &PathGraph {
        &self.graph
    }

    /// Rebuild the base paths if `projection` differs from the cached one.
    /// Returns whether anything was rebuilt.
    pub fn refresh_base(&mut self, projection: &Projection) -> bool {
        if self.base_for.as_ref() == Some(projection) {
            return false;
        }
        self.base = compute_base_paths(&self.graph, projection);
        self.base_for = Some(*projection);
        log::debug!(
            "[path] base paths rebuilt for {:.0}x{:.0}",
            projection.width,
            projection.height
        );
        true
    }

    /// Base paths for `projection`, rebuilt only when the projection changed.
    pub fn base_paths(&mut self, projection: &Projection) -> &[Segment] {
        self.refresh_base(projection);
        &self.base
    }

    /// Cached base paths without rebuilding (empty before the first build).
    pub fn cached_base_paths(&self) -> &[Segment] {
        &self.base
    }

    pub fn illuminate(&mut self, projection: &Projection, progress: f32) -> &[Segment] {
        illuminate_into(&mut self.lit, &self.graph, projection, progress);
        &self.lit
    }

    /// Lit segments from the last `illuminate` call.
    pub fn illuminated(&self) -> &[Segment] {
        &self.lit
    }

    /// Drop cached geometry, e.g. after a resize.
    pub fn invalidate(&mut self) {
        self.base_for = None;
    }

    /// Waypoints the beam has reached at `progress`.
    pub fn reached_nodes(&self, progress: f32) -> impl Iterator<Item = &Node> + '_ {
        self.graph
            .nodes()
            .iter()
            .filter(move |n| n.activation_threshold <= progress)
    }

    /// Projected positions of the reached waypoints, in graph order. Reuses
    /// the tracer's buffer.
    pub fn mark_reached(&mut self, projection: &Projection, progress: f32) -> &[Vec2] {
        let mut reached = std::mem::take(&mut self.reached);
        reached.clear();
        reached.extend(self.reached_nodes(progress).map(|n| projection.project(n.position())));
        self.reached = reached;
        &self.reached
    }

    /// Waypoints from the last `mark_reached` call.
    pub fn reached_points(&self) -> &[Vec2] {
        &self.reached
    }
}
