#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use std::rc::Rc;

use beam_core::sync::{self, ParallaxDirection};
use beam_core::{BeamRuntime, LightBroadcaster, LightEvent, ScrollContext, Subscription, ViewportSource};
use wasm_bindgen::prelude::*;

mod config;
mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod overlay;
mod render;

use constants::CONFIG_SCRIPT_ID;
use dom::DomViewport;

pub(crate) type SharedRuntime = Rc<RefCell<BeamRuntime<DomViewport>>>;

fn light_event_object(ev: &LightEvent) -> Result<js_sys::Object, JsValue> {
    let obj = js_sys::Object::new();
    js_sys::Reflect::set(&obj, &"sectionId".into(), &JsValue::from_str(&ev.section_id))?;
    js_sys::Reflect::set(&obj, &"isActive".into(), &JsValue::from_bool(ev.is_active))?;
    js_sys::Reflect::set(&obj, &"progress".into(), &JsValue::from_f64(ev.progress as f64))?;
    Ok(obj)
}

/// Handle the page keeps for the lifetime of the beam. Dropping it (or calling
/// `dispose`) detaches every listener and stops the frame loop.
#[wasm_bindgen]
pub struct BeamApp {
    rt: SharedRuntime,
    context: ScrollContext,
    broadcaster: LightBroadcaster,
    viewport: DomViewport,
    section_count: usize,
    listeners: Vec<events::Listener>,
    frame_loop: Option<frame::FrameLoop>,
    subs: Vec<(u32, Subscription)>,
    debug: bool,
}

fn init() -> anyhow::Result<BeamApp> {
    let viewport = DomViewport::new()?;
    let window = viewport.window().clone();
    let document = viewport.document().clone();

    let cfg = config::parse_config(dom::element_text(&document, CONFIG_SCRIPT_ID).as_deref());
    let debug = cfg.debug;
    log::info!(
        "[beam] sections={:?} light_offset={:.2} smooth={}",
        cfg.sections,
        cfg.light_offset,
        cfg.scroll.smooth
    );

    let section_count = cfg.sections.len();
    let mut runtime = BeamRuntime::new(cfg, viewport.clone())?;
    match render::SvgPathRenderer::new(&document) {
        Ok(svg) => runtime.add_renderer(Box::new(svg)),
        Err(e) => log::warn!("[beam] rails disabled: {:#}", e),
    }
    runtime.add_renderer(Box::new(render::SectionGlowRenderer::new(&document)));
    let context = runtime.context();
    let broadcaster = runtime.broadcaster();
    let rt: SharedRuntime = Rc::new(RefCell::new(runtime));

    let mut listeners = events::wire_scroll_input(&rt, &window)?;
    listeners.extend(events::wire_page_events(&rt, &window)?);

    if debug {
        overlay::show_debug(&document);
    }
    let frame_loop = frame::FrameLoop::start(rt.clone(), debug);

    Ok(BeamApp {
        rt,
        context,
        broadcaster,
        viewport,
        section_count,
        listeners,
        frame_loop: Some(frame_loop),
        subs: Vec::new(),
        debug,
    })
}

#[wasm_bindgen]
impl BeamApp {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<BeamApp, JsValue> {
        init().map_err(|e| {
            log::error!("init error: {:?}", e);
            JsValue::from_str(&format!("{:#}", e))
        })
    }

    /// Call `callback({ sectionId, isActive, progress })` whenever the light
    /// touches or leaves `section_id`. Returns a token for `offLight`.
    #[wasm_bindgen(js_name = onLight)]
    pub fn on_light(&mut self, section_id: &str, callback: js_sys::Function) -> u32 {
        let sub = self.broadcaster.try_subscribe(section_id, move |ev| {
            let obj = light_event_object(ev)
                .map_err(|e| anyhow::anyhow!("build light event: {:?}", e))?;
            callback
                .call1(&JsValue::NULL, &obj)
                .map_err(|e| anyhow::anyhow!("light handler threw: {:?}", e))?;
            Ok(())
        });
        let token = sub.token() as u32;
        self.subs.push((token, sub));
        token
    }

    /// Drop a subscription made with `onLight`. False for unknown tokens.
    #[wasm_bindgen(js_name = offLight)]
    pub fn off_light(&mut self, token: u32) -> bool {
        let Some(pos) = self.subs.iter().position(|(t, _)| *t == token) else {
            return false;
        };
        let (_, sub) = self.subs.swap_remove(pos);
        sub.unsubscribe();
        true
    }

    /// Scroll so the section's top lands `offset` px below the viewport top
    /// (negative offsets leave room for a fixed header).
    #[wasm_bindgen(js_name = scrollToSection)]
    pub fn scroll_to_section(&self, section_id: &str, offset: f32, immediate: Option<bool>) -> bool {
        match self.rt.try_borrow_mut() {
            Ok(mut rt) => rt.scroll_to_section(section_id, offset, immediate.unwrap_or(false)),
            Err(_) => {
                log::warn!("[beam] scrollToSection({}) ignored: called during a frame", section_id);
                false
            }
        }
    }

    #[wasm_bindgen(js_name = scrollTo)]
    pub fn scroll_to(&self, y: f32, immediate: Option<bool>) {
        match self.rt.try_borrow_mut() {
            Ok(mut rt) => rt.scroll_to(y, immediate.unwrap_or(false)),
            Err(_) => log::warn!("[beam] scrollTo({:.0}) ignored: called during a frame", y),
        }
    }

    /// Global scroll progress in [0, 1].
    pub fn progress(&self) -> f32 {
        self.context.read().progress
    }

    #[wasm_bindgen(js_name = scrollY)]
    pub fn scroll_y(&self) -> f32 {
        self.context.read().scroll_y
    }

    #[wasm_bindgen(js_name = isScrolling)]
    pub fn is_scrolling(&self) -> bool {
        self.context.read().is_scrolling
    }

    /// Progress through the `index`-th of the configured sections' equal
    /// slices of the page.
    #[wasm_bindgen(js_name = sectionProgress)]
    pub fn section_progress(&self, index: usize) -> f32 {
        sync::section_progress(self.progress(), index, self.section_count)
    }

    /// Position of the current progress inside `[start, end]`, clamped.
    #[wasm_bindgen(js_name = rangeProgress)]
    pub fn range_progress(&self, start: f32, end: f32) -> f32 {
        sync::scroll_range(self.progress(), start, end)
    }

    #[wasm_bindgen(js_name = fadeOpacity)]
    pub fn fade_opacity(&self, start: f32, end: f32, fade_in: f32, fade_out: f32) -> f32 {
        sync::fade_opacity(self.progress(), start, end, fade_in, fade_out)
    }

    #[wasm_bindgen(js_name = scaleBetween)]
    pub fn scale_between(&self, start: f32, end: f32, min: f32, max: f32) -> f32 {
        sync::scale_between(self.progress(), start, end, min, max)
    }

    /// Parallax offset in px; moves up unless `down` is set.
    #[wasm_bindgen(js_name = parallaxY)]
    pub fn parallax_y(&self, strength: f32, down: Option<bool>) -> f32 {
        let direction = if down.unwrap_or(false) {
            ParallaxDirection::Down
        } else {
            ParallaxDirection::Up
        };
        sync::parallax_y(self.progress(), strength, direction)
    }

    /// `{ visible, progress }` for a section element, or `undefined` when it
    /// is not on the page.
    #[wasm_bindgen(js_name = sectionVisibility)]
    pub fn section_visibility(&self, section_id: &str, trigger_fraction: f32) -> Result<JsValue, JsValue> {
        let Some(rect) = self.viewport.bounding_rect(section_id) else {
            return Ok(JsValue::UNDEFINED);
        };
        let vis = sync::viewport_visibility(rect, self.viewport.viewport_height(), trigger_fraction);
        let obj = js_sys::Object::new();
        js_sys::Reflect::set(&obj, &"visible".into(), &JsValue::from_bool(vis.visible))?;
        js_sys::Reflect::set(&obj, &"progress".into(), &JsValue::from_f64(vis.progress as f64))?;
        Ok(obj.into())
    }

    #[wasm_bindgen(js_name = debugText)]
    pub fn debug_text(&self) -> String {
        self.rt
            .try_borrow()
            .map(|rt| rt.debug_snapshot().to_string())
            .unwrap_or_default()
    }

    /// Tear everything down. Safe to call more than once.
    pub fn dispose(&mut self) {
        if let Some(frame_loop) = self.frame_loop.take() {
            frame_loop.cancel();
        }
        self.listeners.clear();
        for (_, sub) in self.subs.drain(..) {
            sub.unsubscribe();
        }
        if let Ok(mut rt) = self.rt.try_borrow_mut() {
            if !rt.is_disposed() {
                rt.dispose();
                if self.debug {
                    overlay::hide_debug(rt.viewport().document());
                }
                log::info!("[beam] disposed");
            }
        }
    }
}

impl Drop for BeamApp {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("beam-web starting");
    Ok(())
}
