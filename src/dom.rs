use beam_core::{Rect, ViewportSource};
use web_sys as web;

use crate::constants::{REDUCED_MOTION_QUERY, SVG_NS};

pub fn create_svg_element(document: &web::Document, tag: &str) -> anyhow::Result<web::Element> {
    document
        .create_element_ns(Some(SVG_NS), tag)
        .map_err(|e| anyhow::anyhow!("create <{}>: {:?}", tag, e))
}

/// Text of an element, e.g. an inline JSON `<script>`.
pub fn element_text(document: &web::Document, id: &str) -> Option<String> {
    document.get_element_by_id(id).and_then(|el| el.text_content())
}

/// The live page as a [`ViewportSource`].
///
/// Every read goes to the DOM; nothing is cached, so layout shifts and resizes
/// are picked up on the next frame.
#[derive(Clone)]
pub struct DomViewport {
    window: web::Window,
    document: web::Document,
}

impl DomViewport {
    pub fn new() -> anyhow::Result<Self> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| anyhow::anyhow!("no document"))?;
        Ok(Self { window, document })
    }

    pub fn window(&self) -> &web::Window {
        &self.window
    }

    pub fn document(&self) -> &web::Document {
        &self.document
    }

    fn js_px(v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>) -> f32 {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
    }
}

impl ViewportSource for DomViewport {
    fn viewport_width(&self) -> f32 {
        Self::js_px(self.window.inner_width())
    }

    fn viewport_height(&self) -> f32 {
        Self::js_px(self.window.inner_height())
    }

    fn document_height(&self) -> f32 {
        self.document
            .document_element()
            .map(|el| el.scroll_height() as f32)
            .unwrap_or(0.0)
    }

    fn scroll_y(&self) -> f32 {
        self.window.scroll_y().unwrap_or(0.0) as f32
    }

    fn set_scroll_y(&self, y: f32) {
        self.window.scroll_to_with_x_and_y(0.0, y as f64);
    }

    fn bounding_rect(&self, id: &str) -> Option<Rect> {
        let r = self.document.get_element_by_id(id)?.get_bounding_client_rect();
        Some(Rect::new(r.top() as f32, r.bottom() as f32))
    }

    /// Users asking for reduced motion get native scrolling.
    fn supports_smooth_scroll(&self) -> bool {
        match self.window.match_media(REDUCED_MOTION_QUERY) {
            Ok(Some(mq)) => !mq.matches(),
            _ => true,
        }
    }
}
