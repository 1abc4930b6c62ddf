pub mod context;
pub mod engine;
pub mod smooth;

pub use context::{Lifecycle, ScrollContext, ScrollState, ScrollWriter};
pub use engine::{normalize_progress, BackendKind, ScrollConfig, ScrollEngine, ScrollInput};
pub use smooth::{InputSource, SmoothScroller, SmoothingConfig};
