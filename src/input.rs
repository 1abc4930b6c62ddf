// Pure input helpers: browser wheel/touch values to scroll deltas in px.

use crate::constants::{WHEEL_DELTA_LINE, WHEEL_DELTA_PAGE, WHEEL_LINE_HEIGHT_PX};

/// Convert `WheelEvent.deltaY` to px according to its `deltaMode`.
#[inline]
pub fn normalize_wheel_delta(delta: f64, mode: u32, viewport_height: f32) -> f32 {
    let d = delta as f32;
    if !d.is_finite() {
        return 0.0;
    }
    match mode {
        WHEEL_DELTA_LINE => d * WHEEL_LINE_HEIGHT_PX,
        WHEEL_DELTA_PAGE => d * viewport_height,
        _ => d,
    }
}

/// Tracks a single-finger drag and reports scroll deltas. Dragging the finger
/// up scrolls the page down, so deltas are `previous - current`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TouchTracker {
    last_y: Option<f32>,
}

impl TouchTracker {
    pub fn begin(&mut self, y: f32) {
        self.last_y = Some(y);
    }

    /// Delta since the previous sample. The first sample of a drag only starts
    /// tracking and yields `None`.
    pub fn update(&mut self, y: f32) -> Option<f32> {
        let prev = self.last_y.replace(y)?;
        Some(prev - y)
    }

    pub fn end(&mut self) {
        self.last_y = None;
    }

    pub fn is_active(&self) -> bool {
        self.last_y.is_some()
    }
}
