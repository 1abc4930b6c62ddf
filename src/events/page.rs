use beam_core::ViewportEvent;
use web_sys as web;

use super::Listener;
use crate::SharedRuntime;

fn forward(rt: &SharedRuntime, event: ViewportEvent) {
    if let Ok(mut rt) = rt.try_borrow_mut() {
        rt.handle(event);
    }
}

/// Native scroll (scrollbar, keyboard, anchors) and viewport resizes.
pub fn wire_page_events(rt: &SharedRuntime, window: &web::Window) -> anyhow::Result<Vec<Listener>> {
    let target: &web::EventTarget = window.as_ref();

    let rt_scroll = rt.clone();
    let scroll = Listener::new(target, "scroll", true, move |_ev: web::Event| {
        forward(&rt_scroll, ViewportEvent::Scroll);
    })?;

    let rt_resize = rt.clone();
    let resize = Listener::new(target, "resize", true, move |_ev: web::Event| {
        forward(&rt_resize, ViewportEvent::Resize);
    })?;

    Ok(vec![scroll, resize])
}
