use std::cell::{Cell, RefCell};
use std::rc::Rc;

use beam_core::FrameOutcome;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::{overlay, SharedRuntime};

type Tick = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// The single requestAnimationFrame loop. Each tick runs one runtime frame;
/// the loop stops for good once cancelled or once the runtime reports
/// cancellation.
pub struct FrameLoop {
    tick: Tick,
    handle: Rc<Cell<Option<i32>>>,
    stopped: Rc<Cell<bool>>,
}

fn request(tick: &Tick) -> Option<i32> {
    let window = web::window()?;
    let tick = tick.borrow();
    let cb = tick.as_ref()?;
    window.request_animation_frame(cb.as_ref().unchecked_ref()).ok()
}

impl FrameLoop {
    pub fn start(rt: SharedRuntime, debug_hud: bool) -> Self {
        let tick: Tick = Rc::new(RefCell::new(None));
        let handle = Rc::new(Cell::new(None));
        let stopped = Rc::new(Cell::new(false));

        let tick_next = tick.clone();
        let handle_next = handle.clone();
        let stopped_next = stopped.clone();
        *tick.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            handle_next.set(None);
            if stopped_next.get() {
                return;
            }
            let outcome = match rt.try_borrow_mut() {
                Ok(mut rt) => {
                    let outcome = rt.frame(ts);
                    if debug_hud {
                        overlay::update_debug(rt.viewport().document(), &rt.debug_snapshot().to_string());
                    }
                    outcome
                }
                // Busy (an event handler is mid-update); try again next frame.
                Err(_) => FrameOutcome::Skipped,
            };
            if outcome == FrameOutcome::Cancelled {
                stopped_next.set(true);
                return;
            }
            handle_next.set(request(&tick_next));
        }) as Box<dyn FnMut(f64)>));

        handle.set(request(&tick));
        Self {
            tick,
            handle,
            stopped,
        }
    }

    /// Cancel the pending frame and stop the loop. Idempotent.
    pub fn cancel(&self) {
        if self.stopped.replace(true) {
            return;
        }
        if let (Some(id), Some(w)) = (self.handle.take(), web::window()) {
            _ = w.cancel_animation_frame(id);
        }
        log::debug!("[frame] loop cancelled");
    }

    pub fn is_running(&self) -> bool {
        !self.stopped.get()
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
        // Break the closure's reference to itself.
        self.tick.borrow_mut().take();
    }
}

