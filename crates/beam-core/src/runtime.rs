// Per-page orchestration.
//
// One runtime per page. Each animation frame runs the same pipeline in a
// fixed order: scroll engine, boundary detection, path tracing, light
// broadcast, renderers, then any extra frame callbacks. If any stage fails
// the rest of the frame is dropped and the previous frame stays on screen.

use crate::broadcast::LightBroadcaster;
use crate::config::BeamConfig;
use crate::debug::DebugSnapshot;
use crate::driver::{guard_frame, FrameDriver, FrameOutcome};
use crate::error::ConfigError;
use crate::path::{CoordinateSpace, PathExtent, PathGraph, PathTracer, Projection};
use crate::render::{FrameView, PathRenderer};
use crate::scroll::{BackendKind, ScrollContext, ScrollEngine, ScrollInput};
use crate::section::{BoundaryDetector, SectionRegistry};
use crate::viewport::ViewportSource;

/// Host events the runtime reacts to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewportEvent {
    Wheel { delta_y: f32 },
    Touch { delta_y: f32 },
    /// The page scrolled natively (scrollbar, keyboard, anchor jump).
    Scroll,
    Resize,
}

pub struct BeamRuntime<V: ViewportSource> {
    viewport: V,
    context: ScrollContext,
    engine: ScrollEngine,
    detector: BoundaryDetector,
    tracer: PathTracer,
    broadcaster: LightBroadcaster,
    driver: FrameDriver,
    renderers: Vec<Box<dyn PathRenderer>>,
    space: CoordinateSpace,
    layout_dirty: bool,
    disposed: bool,
}

impl<V: ViewportSource> BeamRuntime<V> {
    pub fn new(config: BeamConfig, viewport: V) -> Result<Self, ConfigError> {
        let registry = SectionRegistry::new(config.sections.iter().cloned())?;
        let detector = BoundaryDetector::new(registry, config.light_offset)?.with_debug(config.debug);
        let graph = PathGraph::from_spec(config.graph_spec())?;
        log::info!(
            "[beam] {} sections, {} waypoints, {} edges",
            detector.registry().len(),
            graph.nodes().len(),
            graph.edges().len()
        );
        let (context, writer) = ScrollContext::new();
        let engine = ScrollEngine::start(config.scroll, &viewport, writer);
        Ok(Self {
            viewport,
            context,
            engine,
            detector,
            tracer: PathTracer::new(graph),
            broadcaster: LightBroadcaster::new(),
            driver: FrameDriver::new(),
            renderers: Vec::new(),
            space: config.space,
            layout_dirty: false,
            disposed: false,
        })
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    /// Read handle on the scroll state. Cheap to clone and hand out.
    pub fn context(&self) -> ScrollContext {
        self.context.clone()
    }

    pub fn broadcaster(&self) -> LightBroadcaster {
        self.broadcaster.clone()
    }

    pub fn detector(&self) -> &BoundaryDetector {
        &self.detector
    }

    pub fn tracer(&self) -> &PathTracer {
        &self.tracer
    }

    pub fn driver(&self) -> &FrameDriver {
        &self.driver
    }

    /// For registering extra per-frame callbacks.
    pub fn driver_mut(&mut self) -> &mut FrameDriver {
        &mut self.driver
    }

    pub fn backend(&self) -> BackendKind {
        self.engine.backend_kind()
    }

    pub fn add_renderer(&mut self, renderer: Box<dyn PathRenderer>) {
        self.renderers.push(renderer);
    }

    pub fn handle(&mut self, event: ViewportEvent) {
        if self.disposed {
            return;
        }
        let input = match event {
            ViewportEvent::Wheel { delta_y } => ScrollInput::Wheel { delta_y },
            ViewportEvent::Touch { delta_y } => ScrollInput::Touch { delta_y },
            ViewportEvent::Scroll => ScrollInput::Native,
            ViewportEvent::Resize => {
                self.layout_dirty = true;
                return;
            }
        };
        self.engine.push_input(input, &self.viewport);
    }

    /// Scroll to `section_id`'s top plus `offset_px` (negative stops short,
    /// e.g. `-80.0` for a fixed header). False if the section is not on the page.
    pub fn scroll_to_section(&mut self, section_id: &str, offset_px: f32, immediate: bool) -> bool {
        if self.disposed {
            return false;
        }
        let Some(rect) = self.viewport.bounding_rect(section_id) else {
            log::warn!("[beam] scroll_to_section: {} not found", section_id);
            return false;
        };
        let target = rect.top + self.viewport.scroll_y() + offset_px;
        self.engine.scroll_to(target, immediate, &self.viewport);
        true
    }

    /// Scroll to an absolute document offset.
    pub fn scroll_to(&mut self, y: f32, immediate: bool) {
        if !self.disposed {
            self.engine.scroll_to(y, immediate, &self.viewport);
        }
    }

    /// Projection for the current layout.
    pub fn projection(&self) -> Projection {
        let height = match self.space.extent {
            PathExtent::Viewport => self.viewport.viewport_height(),
            PathExtent::Document => self.viewport.document_height(),
        };
        Projection::new(self.space, self.viewport.viewport_width(), height)
    }

    /// Run one animation frame.
    pub fn frame(&mut self, timestamp_ms: f64) -> FrameOutcome {
        if self.disposed {
            return FrameOutcome::Cancelled;
        }
        let Some(info) = self.driver.begin(timestamp_ms) else {
            return FrameOutcome::Cancelled;
        };
        if let Err(e) = guard_frame(|| self.step(timestamp_ms)) {
            log::error!("[beam] frame {} failed, skipped: {}", info.index, e);
            self.driver.note_skipped();
            return FrameOutcome::Skipped;
        }
        self.driver.run(&info)
    }

    fn step(&mut self, timestamp_ms: f64) -> anyhow::Result<()> {
        let Some(state) = self.engine.frame(timestamp_ms, &self.viewport) else {
            return Ok(());
        };
        if self.layout_dirty {
            self.tracer.invalidate();
            self.layout_dirty = false;
        }
        let projection = self.projection();
        let base_changed = self.tracer.refresh_base(&projection);
        self.detector.detect(&self.viewport, &state);
        self.tracer.illuminate(&projection, state.progress);
        self.tracer.mark_reached(&projection, state.progress);

        for hit in self.detector.hits().iter().filter(|h| h.touched) {
            self.broadcaster.publish(&hit.id, true, hit.local_progress);
        }
        for id in &self.detector.transition().left {
            let progress = self
                .detector
                .hits()
                .iter()
                .find(|h| &h.id == id)
                .map(|h| h.local_progress)
                .unwrap_or(0.0);
            self.broadcaster.publish(id, false, progress);
        }

        let view = FrameView {
            state: &state,
            sections: self.detector.hits(),
            active_section: self.detector.active(),
            light_y: self.detector.last_light_y(),
            base: self.tracer.cached_base_paths(),
            base_changed,
            lit: self.tracer.illuminated(),
            waypoints: self.tracer.reached_points(),
        };
        for r in self.renderers.iter_mut() {
            r.render(&view)?;
        }
        Ok(())
    }

    pub fn debug_snapshot(&self) -> DebugSnapshot {
        let state = self.context.read();
        DebugSnapshot {
            progress: state.progress,
            scroll_y: state.scroll_y,
            is_scrolling: state.is_scrolling,
            backend: self.engine.backend_kind(),
            active_section: self.detector.active().map(str::to_string),
            lit_segments: self.tracer.illuminated().len(),
            frames: self.driver.frames(),
            skipped: self.driver.skipped(),
        }
    }

    /// Tear everything down. Idempotent. Afterwards no frame work runs, the
    /// page is never scrolled again and the context holds its last value.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.driver.cancel();
        self.engine.dispose();
        for r in self.renderers.iter_mut() {
            r.clear();
        }
        self.renderers.clear();
        log::info!("[beam] disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}
