use std::cell::Cell;
use std::rc::Rc;

use beam_core::{BackendKind, ViewportEvent, ViewportSource};
use wasm_bindgen::JsCast;
use web_sys as web;

use super::Listener;
use crate::input::{normalize_wheel_delta, TouchTracker};
use crate::SharedRuntime;

/// Feed `event` to the runtime. Returns whether the smooth backend consumed
/// it, in which case the browser's own scroll must be suppressed.
fn feed(rt: &SharedRuntime, event: ViewportEvent) -> bool {
    let Ok(mut rt) = rt.try_borrow_mut() else {
        return false;
    };
    if rt.backend() != BackendKind::Smooth {
        return false;
    }
    rt.handle(event);
    true
}

fn first_touch_y(ev: &web::TouchEvent) -> Option<f32> {
    ev.touches().item(0).map(|t| t.client_y() as f32)
}

/// Wheel and touch drags on the window. Only intercepted while smoothing is
/// active; in the raw fallback the browser scrolls natively.
pub fn wire_scroll_input(rt: &SharedRuntime, window: &web::Window) -> anyhow::Result<Vec<Listener>> {
    let target: &web::EventTarget = window.as_ref();
    let mut listeners = Vec::with_capacity(4);

    let rt_wheel = rt.clone();
    listeners.push(Listener::new(target, "wheel", false, move |ev: web::Event| {
        let Some(wheel) = ev.dyn_ref::<web::WheelEvent>() else {
            return;
        };
        let vh = match rt_wheel.try_borrow() {
            Ok(rt) => rt.viewport().viewport_height(),
            Err(_) => return,
        };
        let delta_y = normalize_wheel_delta(wheel.delta_y(), wheel.delta_mode(), vh);
        if feed(&rt_wheel, ViewportEvent::Wheel { delta_y }) {
            ev.prevent_default();
        }
    })?);

    let touch = Rc::new(Cell::new(TouchTracker::default()));

    let t = touch.clone();
    listeners.push(Listener::new(target, "touchstart", true, move |ev: web::Event| {
        let Some(y) = ev.dyn_ref::<web::TouchEvent>().and_then(first_touch_y) else {
            return;
        };
        let mut tracker = t.get();
        tracker.begin(y);
        t.set(tracker);
    })?);

    let t = touch.clone();
    let rt_touch = rt.clone();
    listeners.push(Listener::new(target, "touchmove", false, move |ev: web::Event| {
        let Some(y) = ev.dyn_ref::<web::TouchEvent>().and_then(first_touch_y) else {
            return;
        };
        let mut tracker = t.get();
        let delta = tracker.update(y);
        t.set(tracker);
        if let Some(delta_y) = delta {
            if feed(&rt_touch, ViewportEvent::Touch { delta_y }) {
                ev.prevent_default();
            }
        }
    })?);

    let t = touch;
    listeners.push(Listener::new(target, "touchend", true, move |_ev: web::Event| {
        let mut tracker = t.get();
        tracker.end();
        t.set(tracker);
    })?);

    Ok(listeners)
}
