// Read-only projection of the latest scroll state.
//
// One [`ScrollWriter`] (owned by the engine) and any number of
// [`ScrollContext`] readers share a single cell. Everything runs on the
// animation-frame thread, so a `Cell` is all the synchronization needed.

use std::cell::Cell;
use std::rc::Rc;

/// Snapshot published once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollState {
    /// Fraction of the scrollable distance traversed, always in [0, 1].
    pub progress: f32,
    /// Signed change of the scroll offset since the previous frame (px/frame).
    pub velocity: f32,
    pub is_scrolling: bool,
    /// Scroll offset the progress was computed from.
    pub scroll_y: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lifecycle {
    /// Engine not started yet; reads return the zeroed default.
    #[default]
    Idle,
    Live,
    /// Engine torn down; reads return the last published value.
    Disposed,
}

#[derive(Clone, Copy, Debug, Default)]
struct Slot {
    state: ScrollState,
    lifecycle: Lifecycle,
}

/// Cheap-to-clone reader handle.
#[derive(Clone, Debug)]
pub struct ScrollContext {
    slot: Rc<Cell<Slot>>,
}

/// The single write handle. Deliberately not `Clone`.
#[derive(Debug)]
pub struct ScrollWriter {
    slot: Rc<Cell<Slot>>,
}

impl ScrollContext {
    pub fn new() -> (ScrollContext, ScrollWriter) {
        let slot = Rc::new(Cell::new(Slot::default()));
        (
            ScrollContext { slot: slot.clone() },
            ScrollWriter { slot },
        )
    }

    /// Latest published state.
    #[inline]
    pub fn read(&self) -> ScrollState {
        self.slot.get().state
    }

    #[inline]
    pub fn lifecycle(&self) -> Lifecycle {
        self.slot.get().lifecycle
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        self.lifecycle() == Lifecycle::Live
    }
}

impl ScrollWriter {
    pub(crate) fn go_live(&self) {
        let mut s = self.slot.get();
        s.lifecycle = Lifecycle::Live;
        self.slot.set(s);
    }

    /// Store a new state. Ignored unless the context is live.
    pub(crate) fn publish(&self, state: ScrollState) -> bool {
        let mut s = self.slot.get();
        if s.lifecycle != Lifecycle::Live {
            return false;
        }
        s.state = state;
        self.slot.set(s);
        true
    }

    /// Freeze at the last published value.
    pub(crate) fn freeze(&self) {
        let mut s = self.slot.get();
        s.lifecycle = Lifecycle::Disposed;
        self.slot.set(s);
    }
}
