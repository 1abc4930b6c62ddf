// Rendering strategies.
//
// Every visual variant (rail, tracing beam, glow overlay, debug HUD) draws
// from the same computed frame. They differ only in how they draw it.

use glam::Vec2;

use crate::path::Segment;
use crate::scroll::ScrollState;
use crate::section::SectionHit;

/// Everything computed for one frame, borrowed for the renderers.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    pub state: &'a ScrollState,
    pub sections: &'a [SectionHit],
    pub active_section: Option<&'a str>,
    pub light_y: f32,
    pub base: &'a [Segment],
    /// True when `base` was rebuilt this frame (first frame, resize).
    pub base_changed: bool,
    pub lit: &'a [Segment],
    /// Waypoints the beam has reached, in output px.
    pub waypoints: &'a [Vec2],
}

pub trait PathRenderer {
    fn render(&mut self, frame: &FrameView<'_>) -> anyhow::Result<()>;

    /// Release whatever the renderer drew. Called once on teardown.
    fn clear(&mut self) {}
}
