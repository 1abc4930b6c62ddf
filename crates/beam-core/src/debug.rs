use std::fmt;

use crate::scroll::BackendKind;

/// What the on-page scroll debugger shows.
#[derive(Clone, Debug, PartialEq)]
pub struct DebugSnapshot {
    pub progress: f32,
    pub scroll_y: f32,
    pub is_scrolling: bool,
    pub backend: BackendKind,
    pub active_section: Option<String>,
    pub lit_segments: usize,
    pub frames: u64,
    pub skipped: u64,
}

impl fmt::Display for DebugSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let backend = match self.backend {
            BackendKind::Smooth => "smooth",
            BackendKind::Raw => "raw",
            BackendKind::Stopped => "stopped",
        };
        write!(
            f,
            "Progress: {:.1}% | ScrollY: {:.0}px | Scrolling: {} | Backend: {} | Active: {} | Lit: {}",
            self.progress * 100.0,
            self.scroll_y,
            if self.is_scrolling { "yes" } else { "no" },
            backend,
            self.active_section.as_deref().unwrap_or("none"),
            self.lit_segments,
        )?;
        if self.skipped > 0 {
            write!(f, " | Skipped: {}/{}", self.skipped, self.frames + self.skipped)?;
        }
        Ok(())
    }
}
