// Damped scroll backend.
//
// Wheel and touch deltas move a target offset; every frame the animated
// offset eases from where it was when the target last changed toward the
// target over `duration_sec`.

use serde::Deserialize;

use crate::constants::{SMOOTH_DURATION_SEC, TOUCH_MULTIPLIER, WHEEL_MULTIPLIER};
use crate::easing::Easing;
use crate::error::BackendError;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SmoothingConfig {
    pub duration_sec: f32,
    pub easing: Easing,
    pub wheel_multiplier: f32,
    pub touch_multiplier: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            duration_sec: SMOOTH_DURATION_SEC,
            easing: Easing::CubicOut,
            wheel_multiplier: WHEEL_MULTIPLIER,
            touch_multiplier: TOUCH_MULTIPLIER,
        }
    }
}

/// Where a scroll delta came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputSource {
    Wheel,
    Touch,
}

#[derive(Clone, Debug)]
pub struct SmoothScroller {
    cfg: SmoothingConfig,
    animated: f32,
    target: f32,
    from: f32,
    elapsed: f32,
    animating: bool,
}

impl SmoothScroller {
    pub fn new(cfg: SmoothingConfig, initial_y: f32) -> Result<Self, BackendError> {
        if !(cfg.duration_sec.is_finite() && cfg.duration_sec > 0.0) {
            return Err(BackendError::InvalidDuration(cfg.duration_sec));
        }
        for m in [cfg.wheel_multiplier, cfg.touch_multiplier] {
            if !(m.is_finite() && m > 0.0) {
                return Err(BackendError::InvalidMultiplier(m));
            }
        }
        let y = if initial_y.is_finite() { initial_y } else { 0.0 };
        Ok(Self {
            cfg,
            animated: y,
            target: y,
            from: y,
            elapsed: 0.0,
            animating: false,
        })
    }

    /// Nudge the target by a raw input delta, clamped to `[0, limit]`.
    pub fn push_delta(&mut self, delta: f32, source: InputSource, limit: f32) {
        if !delta.is_finite() {
            return;
        }
        let mult = match source {
            InputSource::Wheel => self.cfg.wheel_multiplier,
            InputSource::Touch => self.cfg.touch_multiplier,
        };
        let target = (self.target + delta * mult).clamp(0.0, limit.max(0.0));
        self.retarget(target);
    }

    /// Animate (or jump, when `immediate`) to an absolute offset.
    pub fn scroll_to(&mut self, y: f32, limit: f32, immediate: bool) {
        if !y.is_finite() {
            return;
        }
        let y = y.clamp(0.0, limit.max(0.0));
        if immediate {
            self.sync(y);
        } else {
            self.retarget(y);
        }
    }

    /// Adopt an offset the page reached by other means (scrollbar, keys).
    /// Ignored mid-animation, where the page offset is our own write.
    pub fn observe_native(&mut self, y: f32) {
        if !self.animating && y.is_finite() {
            self.sync(y);
        }
    }

    fn sync(&mut self, y: f32) {
        self.animated = y;
        self.target = y;
        self.from = y;
        self.elapsed = 0.0;
        self.animating = false;
    }

    fn retarget(&mut self, target: f32) {
        if (target - self.target).abs() < f32::EPSILON && self.animating {
            return;
        }
        self.from = self.animated;
        self.target = target;
        self.elapsed = 0.0;
        self.animating = (self.target - self.animated).abs() > f32::EPSILON;
    }

    /// Advance by `dt_sec` and return the new animated offset.
    pub fn step(&mut self, dt_sec: f32, limit: f32) -> f32 {
        let limit = limit.max(0.0);
        if self.target > limit {
            // Content shrank under us.
            self.target = limit;
        }
        if self.animating {
            self.elapsed += dt_sec.max(0.0);
            let t = (self.elapsed / self.cfg.duration_sec).min(1.0);
            let eased = self.cfg.easing.apply(t);
            self.animated = self.from + (self.target - self.from) * eased;
            if t >= 1.0 {
                self.animated = self.target;
                self.animating = false;
            }
        }
        self.animated = self.animated.clamp(0.0, limit);
        self.animated
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }
}
