// DOM event wiring. Every listener is owned by a [`Listener`] and removed
// from its target when dropped, so tearing the app down leaves no handlers
// behind.

mod input;
mod page;

pub use input::wire_scroll_input;
pub use page::wire_page_events;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct Listener {
    target: web::EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(web::Event)>,
}

impl Listener {
    /// Attach `handler`. Non-passive listeners may call `preventDefault`.
    pub fn new<F>(
        target: &web::EventTarget,
        kind: &'static str,
        passive: bool,
        handler: F,
    ) -> anyhow::Result<Self>
    where
        F: FnMut(web::Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        let opts = web::AddEventListenerOptions::new();
        opts.set_passive(passive);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                callback.as_ref().unchecked_ref(),
                &opts,
            )
            .map_err(|e| anyhow::anyhow!("addEventListener({}): {:?}", kind, e))?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}
