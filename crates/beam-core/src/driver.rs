// Single animation-frame driver.
//
// Components register per-frame callbacks here instead of each requesting
// their own frames. Callbacks run in registration order. A failing callback
// ends the frame: it is logged, later callbacks are skipped, and whatever
// state earlier frames produced stays in place.

use std::panic::{self, AssertUnwindSafe};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

/// Timing handed to every callback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInfo {
    /// Frames completed before this one.
    pub index: u64,
    pub timestamp_ms: f64,
    pub dt_ms: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Rendered,
    /// Something failed; the frame was abandoned.
    Skipped,
    Cancelled,
}

type Callback = Box<dyn FnMut(&FrameInfo) -> anyhow::Result<()>>;

#[derive(Default)]
pub struct FrameDriver {
    callbacks: Vec<(CallbackId, Callback)>,
    next_id: u64,
    frames: u64,
    skipped: u64,
    last_ts: Option<f64>,
    cancelled: bool,
}

/// Why a guarded piece of frame work did not complete.
#[derive(Debug)]
pub enum FrameFailure {
    Error(anyhow::Error),
    Panic,
}

impl std::fmt::Display for FrameFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameFailure::Error(e) => write!(f, "{:#}", e),
            FrameFailure::Panic => f.write_str("panicked"),
        }
    }
}

/// Run `f`, turning both errors and panics into a [`FrameFailure`].
///
/// Panic capture needs unwinding. On wasm32-unknown-unknown (`panic=abort`)
/// a panic still takes the module down; only returned errors are isolated
/// there.
pub fn guard_frame<F>(f: F) -> Result<(), FrameFailure>
where
    F: FnOnce() -> anyhow::Result<()>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(FrameFailure::Error(e)),
        Err(_) => Err(FrameFailure::Panic),
    }
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, callback: F) -> CallbackId
    where
        F: FnMut(&FrameInfo) -> anyhow::Result<()> + 'static,
    {
        let id = CallbackId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    pub fn unregister(&mut self, id: CallbackId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(cid, _)| *cid != id);
        before != self.callbacks.len()
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Timing for the next frame without running anything. Advances the
    /// clock, so call it once per frame.
    pub fn begin(&mut self, timestamp_ms: f64) -> Option<FrameInfo> {
        if self.cancelled {
            return None;
        }
        let dt_ms = self
            .last_ts
            .map(|prev| (timestamp_ms - prev).max(0.0))
            .unwrap_or(0.0);
        self.last_ts = Some(timestamp_ms);
        Some(FrameInfo {
            index: self.frames,
            timestamp_ms,
            dt_ms,
        })
    }

    /// Run the registered callbacks for a frame obtained from [`begin`](Self::begin).
    pub fn run(&mut self, info: &FrameInfo) -> FrameOutcome {
        if self.cancelled {
            return FrameOutcome::Cancelled;
        }
        for (id, cb) in self.callbacks.iter_mut() {
            if let Err(e) = guard_frame(|| cb(info)) {
                log::error!("[frame] callback {} failed, frame skipped: {}", id.0, e);
                self.skipped += 1;
                return FrameOutcome::Skipped;
            }
        }
        self.frames += 1;
        FrameOutcome::Rendered
    }

    /// Stop for good and drop every callback.
    pub fn cancel(&mut self) {
        if !self.cancelled {
            self.cancelled = true;
            self.callbacks.clear();
            log::debug!("[frame] driver cancelled after {} frames", self.frames);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Count a frame that failed outside the registered callbacks.
    pub(crate) fn note_skipped(&mut self) {
        self.skipped += 1;
    }
}
