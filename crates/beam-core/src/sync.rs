// Small progress helpers for page elements that animate with scroll.
//
// All inputs are global progress values in [0, 1] unless noted.

use crate::viewport::Rect;

/// Progress through slot `index` of `count` equal slices of the page.
pub fn section_progress(progress: f32, index: usize, count: usize) -> f32 {
    if count == 0 {
        return 0.0;
    }
    let start = index as f32 / count as f32;
    let end = (index + 1) as f32 / count as f32;
    scroll_range(progress, start, end)
}

/// Normalized position of `progress` inside `[start, end]`, clamped.
/// An empty range acts as a step at `start`.
pub fn scroll_range(progress: f32, start: f32, end: f32) -> f32 {
    if end <= start {
        return if progress >= start { 1.0 } else { 0.0 };
    }
    ((progress - start) / (end - start)).clamp(0.0, 1.0)
}

/// Opacity that is 0 outside `[start, end]`, ramps up over `fade_in` after
/// `start`, and ramps down over `fade_out` before `end`.
pub fn fade_opacity(progress: f32, start: f32, end: f32, fade_in: f32, fade_out: f32) -> f32 {
    if progress < start || progress > end {
        return 0.0;
    }
    if fade_in > 0.0 && progress < start + fade_in {
        return (progress - start) / fade_in;
    }
    if fade_out > 0.0 && progress > end - fade_out {
        return (end - progress) / fade_out;
    }
    1.0
}

/// Linear scale from `min` to `max` across `[start, end]`.
pub fn scale_between(progress: f32, start: f32, end: f32, min: f32, max: f32) -> f32 {
    min + (max - min) * scroll_range(progress, start, end)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParallaxDirection {
    #[default]
    Up,
    Down,
}

/// Vertical parallax offset in px.
pub fn parallax_y(progress: f32, strength: f32, direction: ParallaxDirection) -> f32 {
    let offset = progress * strength;
    match direction {
        ParallaxDirection::Up => -offset,
        ParallaxDirection::Down => offset,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Visibility {
    /// Inside the viewport once `trigger_fraction` of it is trimmed from
    /// both edges.
    pub visible: bool,
    /// 0 when the element's top meets the viewport bottom, 1 when its bottom
    /// leaves the viewport top.
    pub progress: f32,
}

/// Visibility of a viewport-relative rect.
pub fn viewport_visibility(rect: Rect, viewport_height: f32, trigger_fraction: f32) -> Visibility {
    let trigger = viewport_height * trigger_fraction;
    let visible = rect.top < viewport_height - trigger && rect.bottom > trigger;
    let span = viewport_height + rect.height();
    let progress = if span > 0.0 {
        ((viewport_height - rect.top) / span).clamp(0.0, 1.0)
    } else {
        0.0
    };
    Visibility { visible, progress }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_slices_cover_the_page() {
        assert_eq!(section_progress(0.0, 0, 4), 0.0);
        assert!((section_progress(0.125, 0, 4) - 0.5).abs() < 1e-6);
        assert_eq!(section_progress(0.3, 0, 4), 1.0);
        assert_eq!(section_progress(0.3, 2, 4), 0.0);
        assert_eq!(section_progress(0.5, 0, 0), 0.0);
    }

    #[test]
    fn empty_range_is_a_step() {
        assert_eq!(scroll_range(0.49, 0.5, 0.5), 0.0);
        assert_eq!(scroll_range(0.5, 0.5, 0.5), 1.0);
    }

    #[test]
    fn fade_ramps_in_and_out() {
        assert_eq!(fade_opacity(0.05, 0.1, 0.9, 0.2, 0.2), 0.0);
        assert!((fade_opacity(0.2, 0.1, 0.9, 0.2, 0.2) - 0.5).abs() < 1e-6);
        assert_eq!(fade_opacity(0.5, 0.1, 0.9, 0.2, 0.2), 1.0);
        assert!((fade_opacity(0.8, 0.1, 0.9, 0.2, 0.2) - 0.5).abs() < 1e-6);
        assert_eq!(fade_opacity(0.95, 0.1, 0.9, 0.2, 0.2), 0.0);
        assert_eq!(fade_opacity(0.1, 0.1, 0.9, 0.0, 0.0), 1.0);
    }

    #[test]
    fn scale_is_clamped() {
        assert_eq!(scale_between(0.0, 0.2, 0.6, 0.8, 1.0), 0.8);
        assert!((scale_between(0.4, 0.2, 0.6, 0.8, 1.0) - 0.9).abs() < 1e-6);
        assert_eq!(scale_between(1.0, 0.2, 0.6, 0.8, 1.0), 1.0);
    }

    #[test]
    fn parallax_direction() {
        assert_eq!(parallax_y(0.5, 50.0, ParallaxDirection::Up), -25.0);
        assert_eq!(parallax_y(0.5, 50.0, ParallaxDirection::Down), 25.0);
    }

    #[test]
    fn visibility_of_rects() {
        let below = viewport_visibility(Rect::new(900.0, 1300.0), 800.0, 0.1);
        assert!(!below.visible);
        assert_eq!(below.progress, 0.0);

        let middle = viewport_visibility(Rect::new(200.0, 600.0), 800.0, 0.1);
        assert!(middle.visible);
        assert!((middle.progress - 0.5).abs() < 1e-6);

        let gone = viewport_visibility(Rect::new(-500.0, -100.0), 800.0, 0.1);
        assert!(!gone.visible);
        assert_eq!(gone.progress, 1.0);
    }
}
