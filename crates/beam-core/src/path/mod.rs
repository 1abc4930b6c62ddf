pub mod graph;
pub mod projection;
pub mod tracer;

pub use graph::{
    illumination_fraction, Edge, EdgeKind, GraphSpec, Node, PathGraph, Point, ResolvedEdge,
};
pub use projection::{CoordinateSpace, PathExtent, Projection, XSpace, YSpace};
pub use tracer::{compute_base_paths, compute_illuminated_paths, split_quad, PathTracer, Segment};
