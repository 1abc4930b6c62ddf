pub mod broadcast;
pub mod config;
pub mod constants;
pub mod debug;
pub mod driver;
pub mod easing;
pub mod error;
pub mod path;
pub mod render;
pub mod runtime;
pub mod scroll;
pub mod section;
pub mod sync;
pub mod viewport;

pub use broadcast::{LightBroadcaster, LightEvent, Subscription};
pub use config::BeamConfig;
pub use debug::DebugSnapshot;
pub use driver::{guard_frame, CallbackId, FrameDriver, FrameFailure, FrameInfo, FrameOutcome};
pub use easing::Easing;
pub use error::{BackendError, ConfigError, GraphError};
pub use path::{PathGraph, PathTracer, Projection, Segment};
pub use render::{FrameView, PathRenderer};
pub use runtime::{BeamRuntime, ViewportEvent};
pub use scroll::{BackendKind, Lifecycle, ScrollConfig, ScrollContext, ScrollState};
pub use section::{BoundaryDetector, SectionHit, SectionPhase, SectionRegistry};
pub use viewport::{MemoryViewport, Rect, ViewportSource};
