// Viewport abstraction shared with the web frontend.
//
// The core never touches the DOM. Page sizes, the scroll offset and live
// section rectangles all come through [`ViewportSource`]. The web crate implements it on top of `web_sys`;
// [`MemoryViewport`] implements it in memory so the pipeline can be driven
// from plain `cargo test`.

use std::cell::{Cell, RefCell};

use fnv::FnvHashMap;

/// Vertical extent of an element, in CSS px.
///
/// Rects returned by [`ViewportSource::bounding_rect`] are viewport-relative,
/// exactly like `getBoundingClientRect()`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub top: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(top: f32, bottom: f32) -> Self {
        Self { top, bottom }
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Shift a viewport-relative rect into document coordinates.
    pub fn to_document(self, scroll_y: f32) -> Self {
        Self {
            top: self.top + scroll_y,
            bottom: self.bottom + scroll_y,
        }
    }
}

/// Everything the core reads from (or writes to) the page.
pub trait ViewportSource {
    fn viewport_width(&self) -> f32;
    fn viewport_height(&self) -> f32;
    /// Full height of the scrolling document.
    fn document_height(&self) -> f32;
    /// Current vertical scroll offset.
    fn scroll_y(&self) -> f32;
    /// Move the page. Used by the smoothing backend to apply its damped offset.
    fn set_scroll_y(&self, y: f32);
    /// Live, viewport-relative rect of the element with `id`, if it is mounted.
    fn bounding_rect(&self, id: &str) -> Option<Rect>;
    /// Whether wheel/touch input can be intercepted for smooth scrolling.
    fn supports_smooth_scroll(&self) -> bool {
        true
    }

    /// Maximum scroll offset. Zero when the document fits the viewport.
    fn scrollable_height(&self) -> f32 {
        let h = self.document_height() - self.viewport_height();
        if h.is_finite() {
            h.max(0.0)
        } else {
            0.0
        }
    }
}

/// In-memory page: fixed sizes, a scroll offset and document-relative
/// section rectangles.
#[derive(Debug)]
pub struct MemoryViewport {
    width: Cell<f32>,
    height: Cell<f32>,
    document_height: Cell<f32>,
    scroll_y: Cell<f32>,
    smooth: bool,
    sections: RefCell<FnvHashMap<String, Rect>>,
}

impl MemoryViewport {
    pub fn new(width: f32, height: f32, document_height: f32) -> Self {
        Self {
            width: Cell::new(width),
            height: Cell::new(height),
            document_height: Cell::new(document_height),
            scroll_y: Cell::new(0.0),
            smooth: true,
            sections: RefCell::new(FnvHashMap::default()),
        }
    }

    /// Report smooth scrolling as unavailable, forcing the raw fallback.
    pub fn without_smooth_scroll(mut self) -> Self {
        self.smooth = false;
        self
    }

    /// Mount a section spanning `top..bottom` in document coordinates.
    pub fn with_section(self, id: &str, top: f32, bottom: f32) -> Self {
        self.insert_section(id, top, bottom);
        self
    }

    pub fn insert_section(&self, id: &str, top: f32, bottom: f32) {
        self.sections
            .borrow_mut()
            .insert(id.to_string(), Rect::new(top, bottom));
    }

    pub fn remove_section(&self, id: &str) -> bool {
        self.sections.borrow_mut().remove(id).is_some()
    }

    pub fn resize(&self, width: f32, height: f32) {
        self.width.set(width);
        self.height.set(height);
    }

    pub fn set_document_height(&self, h: f32) {
        self.document_height.set(h);
    }

    /// Place the scroll offset without clamping, like elastic overscroll on
    /// touch devices.
    pub fn overscroll_to(&self, y: f32) {
        self.scroll_y.set(y);
    }
}

impl ViewportSource for MemoryViewport {
    fn viewport_width(&self) -> f32 {
        self.width.get()
    }

    fn viewport_height(&self) -> f32 {
        self.height.get()
    }

    fn document_height(&self) -> f32 {
        self.document_height.get()
    }

    fn scroll_y(&self) -> f32 {
        self.scroll_y.get()
    }

    fn set_scroll_y(&self, y: f32) {
        // Browsers clamp programmatic scrolling the same way.
        self.scroll_y.set(y.clamp(0.0, self.scrollable_height()));
    }

    fn bounding_rect(&self, id: &str) -> Option<Rect> {
        let sy = self.scroll_y.get();
        self.sections
            .borrow()
            .get(id)
            .map(|r| Rect::new(r.top - sy, r.bottom - sy))
    }

    fn supports_smooth_scroll(&self) -> bool {
        self.smooth
    }
}
