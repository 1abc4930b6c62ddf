use serde::Deserialize;

use super::context::{ScrollState, ScrollWriter};
use super::smooth::{InputSource, SmoothScroller, SmoothingConfig};
use crate::constants::{MAX_FRAME_DT_SEC, RAW_SCROLL_DEBOUNCE_MS, SCROLLING_VELOCITY_EPSILON};
use crate::error::BackendError;
use crate::viewport::ViewportSource;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollConfig {
    /// Set to false to skip the smoothing backend entirely.
    pub smooth: bool,
    pub smoothing: SmoothingConfig,
    /// `|velocity|` above which the page counts as scrolling.
    pub scrolling_epsilon: f32,
    /// Fallback mode only: how long after the last movement we stay "scrolling".
    pub debounce_ms: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth: true,
            smoothing: SmoothingConfig::default(),
            scrolling_epsilon: SCROLLING_VELOCITY_EPSILON,
            debounce_ms: RAW_SCROLL_DEBOUNCE_MS,
        }
    }
}

/// Raw input forwarded by the host's event listeners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrollInput {
    Wheel { delta_y: f32 },
    Touch { delta_y: f32 },
    /// The page scrolled by itself (scrollbar drag, keyboard, anchor jump).
    Native,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    Smooth,
    Raw,
    Stopped,
}

#[derive(Debug)]
struct RawTracker {
    last_change_ms: Option<f64>,
}

#[derive(Debug)]
enum Backend {
    Smooth(SmoothScroller),
    Raw(RawTracker),
}

/// Turns raw scroll input into one smoothed, normalized progress signal and
/// publishes it through the [`ScrollWriter`] once per frame.
#[derive(Debug)]
pub struct ScrollEngine {
    cfg: ScrollConfig,
    backend: Option<Backend>,
    writer: ScrollWriter,
    last_ts: Option<f64>,
    last_y: f32,
}

/// `offset / limit` clamped to [0, 1]; zero for an unscrollable page or
/// non-finite input.
#[inline]
pub fn normalize_progress(offset: f32, limit: f32) -> f32 {
    if !(limit.is_finite() && limit > 0.0) || !offset.is_finite() {
        return 0.0;
    }
    (offset / limit).clamp(0.0, 1.0)
}

impl ScrollEngine {
    /// Attach to the viewport and go live. Falls back to raw tracking when the
    /// smoothing backend can't start.
    pub fn start(cfg: ScrollConfig, viewport: &dyn ViewportSource, writer: ScrollWriter) -> Self {
        let initial_y = viewport.scroll_y();
        let backend = match Self::init_smoothing(&cfg, viewport, initial_y) {
            Ok(s) => {
                log::info!(
                    "[scroll] smooth backend up (duration={:.2}s, easing={:?})",
                    cfg.smoothing.duration_sec,
                    cfg.smoothing.easing
                );
                Backend::Smooth(s)
            }
            Err(e) => {
                log::warn!("[scroll] {}; falling back to raw scroll tracking", e);
                Backend::Raw(RawTracker {
                    last_change_ms: None,
                })
            }
        };
        writer.go_live();
        let limit = viewport.scrollable_height();
        let y = if initial_y.is_finite() { initial_y } else { 0.0 };
        writer.publish(ScrollState {
            progress: normalize_progress(y, limit),
            velocity: 0.0,
            is_scrolling: false,
            scroll_y: y,
        });
        Self {
            cfg,
            backend: Some(backend),
            writer,
            last_ts: None,
            last_y: y,
        }
    }

    fn init_smoothing(
        cfg: &ScrollConfig,
        viewport: &dyn ViewportSource,
        initial_y: f32,
    ) -> Result<SmoothScroller, BackendError> {
        if !cfg.smooth || !viewport.supports_smooth_scroll() {
            return Err(BackendError::Unsupported);
        }
        SmoothScroller::new(cfg.smoothing.clone(), initial_y)
    }

    pub fn backend_kind(&self) -> BackendKind {
        match &self.backend {
            Some(Backend::Smooth(_)) => BackendKind::Smooth,
            Some(Backend::Raw(_)) => BackendKind::Raw,
            None => BackendKind::Stopped,
        }
    }

    pub fn is_running(&self) -> bool {
        self.backend.is_some()
    }

    pub fn push_input(&mut self, input: ScrollInput, viewport: &dyn ViewportSource) {
        let Some(Backend::Smooth(s)) = self.backend.as_mut() else {
            // Raw mode lets the browser scroll natively and samples it per frame.
            return;
        };
        let limit = viewport.scrollable_height();
        match input {
            ScrollInput::Wheel { delta_y } => s.push_delta(delta_y, InputSource::Wheel, limit),
            ScrollInput::Touch { delta_y } => s.push_delta(delta_y, InputSource::Touch, limit),
            ScrollInput::Native => s.observe_native(viewport.scroll_y()),
        }
    }

    /// Programmatic navigation.
    pub fn scroll_to(&mut self, y: f32, immediate: bool, viewport: &dyn ViewportSource) {
        match self.backend.as_mut() {
            Some(Backend::Smooth(s)) => {
                s.scroll_to(y, viewport.scrollable_height(), immediate);
                if immediate {
                    viewport.set_scroll_y(s.target());
                }
            }
            Some(Backend::Raw(_)) => viewport.set_scroll_y(y),
            None => {}
        }
    }

    /// Advance one animation frame and publish the result.
    ///
    /// Returns `None` once the engine has been disposed.
    pub fn frame(&mut self, timestamp_ms: f64, viewport: &dyn ViewportSource) -> Option<ScrollState> {
        let backend = self.backend.as_mut()?;
        let dt_sec = match self.last_ts {
            Some(prev) => (((timestamp_ms - prev) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT_SEC),
            None => 0.0,
        };
        self.last_ts = Some(timestamp_ms);
        let limit = viewport.scrollable_height();

        let (offset, velocity, is_scrolling) = match backend {
            Backend::Smooth(s) => {
                let y = s.step(dt_sec, limit);
                if (viewport.scroll_y() - y).abs() > 0.5 {
                    viewport.set_scroll_y(y);
                }
                let v = y - self.last_y;
                (y, v, v.abs() > self.cfg.scrolling_epsilon)
            }
            Backend::Raw(r) => {
                let raw = viewport.scroll_y();
                let y = if raw.is_finite() { raw } else { self.last_y };
                let v = y - self.last_y;
                if v != 0.0 {
                    r.last_change_ms = Some(timestamp_ms);
                }
                let scrolling = r
                    .last_change_ms
                    .map(|t| timestamp_ms - t < self.cfg.debounce_ms)
                    .unwrap_or(false);
                (y, v, scrolling)
            }
        };
        self.last_y = offset;

        let state = ScrollState {
            progress: normalize_progress(offset, limit),
            velocity,
            is_scrolling,
            scroll_y: offset,
        };
        self.writer.publish(state);
        Some(state)
    }

    /// Stop publishing and release the backend. The context keeps the last
    /// value.
    pub fn dispose(&mut self) {
        if self.backend.take().is_some() {
            self.writer.freeze();
            log::info!("[scroll] engine disposed");
        }
    }
}
