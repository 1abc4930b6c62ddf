// Publish/subscribe channel for light events, keyed by section id.
//
// Delivery is synchronous and in subscription order. Nothing is queued or
// replayed: a late subscriber only sees later events. A handler that returns
// an error is logged and skipped; the other handlers for the same event still
// run. Panics are caught the same way only where panics unwind (host builds);
// wasm32-unknown-unknown aborts on panic, so browser handlers should report
// failure through the returned error.

use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use fnv::FnvHashMap;
use smallvec::SmallVec;

#[derive(Clone, Debug, PartialEq)]
pub struct LightEvent {
    pub section_id: String,
    pub is_active: bool,
    pub progress: f32,
}

type Handler = Rc<RefCell<dyn FnMut(&LightEvent) -> anyhow::Result<()>>>;

struct Subscriber {
    token: u64,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    topics: FnvHashMap<String, SmallVec<[Subscriber; 4]>>,
    next_token: u64,
}

impl Registry {
    fn contains(&self, topic: &str, token: u64) -> bool {
        self.topics
            .get(topic)
            .is_some_and(|subs| subs.iter().any(|s| s.token == token))
    }

    fn remove(&mut self, topic: &str, token: u64) -> bool {
        let Some(subs) = self.topics.get_mut(topic) else {
            return false;
        };
        let before = subs.len();
        subs.retain(|s| s.token != token);
        let removed = subs.len() != before;
        if subs.is_empty() {
            self.topics.remove(topic);
        }
        removed
    }
}

/// Cloneable handle to one shared registry.
#[derive(Clone, Default)]
pub struct LightBroadcaster {
    inner: Rc<RefCell<Registry>>,
}

/// Returned by `subscribe`. Call [`Subscription::unsubscribe`] to stop
/// receiving events; dropping the handle keeps the subscription alive.
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    topic: String,
    token: u64,
    done: Cell<bool>,
}

impl Subscription {
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Safe to call any number of times, including after the broadcaster is
    /// gone.
    pub fn unsubscribe(&self) {
        if self.done.replace(true) {
            return;
        }
        if let Some(reg) = self.registry.upgrade() {
            reg.borrow_mut().remove(&self.topic, self.token);
        }
    }

    pub fn is_active(&self) -> bool {
        !self.done.get() && self.registry.strong_count() > 0
    }
}

impl LightBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, section_id: &str, mut handler: F) -> Subscription
    where
        F: FnMut(&LightEvent) + 'static,
    {
        self.try_subscribe(section_id, move |ev| {
            handler(ev);
            Ok(())
        })
    }

    /// Like [`subscribe`](Self::subscribe) for handlers that can fail.
    pub fn try_subscribe<F>(&self, section_id: &str, handler: F) -> Subscription
    where
        F: FnMut(&LightEvent) -> anyhow::Result<()> + 'static,
    {
        let mut reg = self.inner.borrow_mut();
        // Tokens start at 1 so hosts can use 0 as "none".
        reg.next_token += 1;
        let token = reg.next_token;
        reg.topics
            .entry(section_id.to_string())
            .or_default()
            .push(Subscriber {
                token,
                handler: Rc::new(RefCell::new(handler)),
            });
        Subscription {
            registry: Rc::downgrade(&self.inner),
            topic: section_id.to_string(),
            token,
            done: Cell::new(false),
        }
    }

    /// Remove by token, for hosts that only keep the number.
    pub fn unsubscribe_token(&self, section_id: &str, token: u64) -> bool {
        self.inner.borrow_mut().remove(section_id, token)
    }

    /// Deliver to every current subscriber of `section_id`. Returns how many
    /// handlers completed without error.
    pub fn publish(&self, section_id: &str, is_active: bool, progress: f32) -> usize {
        // Snapshot so handlers may (un)subscribe while we deliver. Subscribers
        // added during delivery wait for the next event; removed ones are
        // skipped.
        let handlers: SmallVec<[(u64, Handler); 4]> = match self.inner.borrow().topics.get(section_id) {
            Some(subs) => subs.iter().map(|s| (s.token, s.handler.clone())).collect(),
            None => return 0,
        };
        let event = LightEvent {
            section_id: section_id.to_string(),
            is_active,
            progress: progress.clamp(0.0, 1.0),
        };

        let mut delivered = 0;
        for (token, h) in handlers {
            if !self.inner.borrow().contains(section_id, token) {
                continue;
            }
            let Ok(mut f) = h.try_borrow_mut() else {
                log::warn!("[light] re-entrant publish to {} skipped", section_id);
                continue;
            };
            match panic::catch_unwind(AssertUnwindSafe(|| (&mut *f)(&event))) {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(e)) => log::error!("[light] subscriber for {} failed: {:#}", section_id, e),
                Err(_) => log::error!("[light] subscriber for {} panicked", section_id),
            }
        }
        delivered
    }

    pub fn subscriber_count(&self, section_id: &str) -> usize {
        self.inner
            .borrow()
            .topics
            .get(section_id)
            .map_or(0, |s| s.len())
    }

    pub fn topic_count(&self) -> usize {
        self.inner.borrow().topics.len()
    }
}
