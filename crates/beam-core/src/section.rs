// Section registry and boundary detection.
//
// The illumination cursor sits at a fixed fraction of the viewport and then
// moves with scroll. Every run resolves each registered section's live rect
// and reports whether the cursor is inside it and how far through it is.

use crate::constants::{
    SECTION_ENTERING_END, SECTION_ENTER_THRESHOLD, SECTION_LEAVING_START, SECTION_MIN_INTENSITY,
};
use crate::error::ConfigError;
use crate::scroll::ScrollState;
use crate::viewport::ViewportSource;

/// Ordered list of unique section ids.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SectionRegistry {
    ids: Vec<String>,
}

impl SectionRegistry {
    pub fn new<I, S>(ids: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for (i, id) in ids.into_iter().enumerate() {
            let id = id.into();
            if id.trim().is_empty() {
                return Err(ConfigError::EmptySection(i));
            }
            if out.contains(&id) {
                return Err(ConfigError::DuplicateSection(id));
            }
            out.push(id);
        }
        Ok(Self { ids: out })
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|s| s == id)
    }
}

/// Where the cursor is within a touched section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionPhase {
    Outside,
    Entering,
    Inside,
    Leaving,
}

impl SectionPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            SectionPhase::Outside => "outside",
            SectionPhase::Entering => "entering",
            SectionPhase::Inside => "inside",
            SectionPhase::Leaving => "leaving",
        }
    }
}

/// Detection result for one mounted section.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionHit {
    pub id: String,
    /// Document-relative top edge.
    pub top: f32,
    /// Document-relative bottom edge.
    pub bottom: f32,
    /// `top <= light_y <= bottom`.
    pub touched: bool,
    /// `(light_y - top) / (bottom - top)` clamped to [0, 1].
    pub local_progress: f32,
}

impl SectionHit {
    /// Glow strength: strongest with the cursor at the section's middle,
    /// never below a small floor while touched.
    pub fn intensity(&self) -> f32 {
        if !self.touched {
            return 0.0;
        }
        let off_center = (self.local_progress - 0.5).abs() * 2.0;
        (1.0 - off_center).max(SECTION_MIN_INTENSITY)
    }

    pub fn phase(&self) -> SectionPhase {
        let p = self.local_progress;
        if !self.touched || p < SECTION_ENTER_THRESHOLD {
            SectionPhase::Outside
        } else if p < SECTION_ENTERING_END {
            SectionPhase::Entering
        } else if p > SECTION_LEAVING_START {
            SectionPhase::Leaving
        } else {
            SectionPhase::Inside
        }
    }
}

/// Document Y of the illumination cursor.
#[inline]
pub fn light_y(viewport_height: f32, base_offset_fraction: f32, scroll_y: f32, progress: f32) -> f32 {
    viewport_height * base_offset_fraction + scroll_y * progress
}

/// Fraction of `top..bottom` covered by `y`, clamped. A zero-height section
/// counts as fully traversed once reached.
#[inline]
pub fn local_progress(y: f32, top: f32, bottom: f32) -> f32 {
    let h = bottom - top;
    if !(h > 0.0) {
        return if y >= top { 1.0 } else { 0.0 };
    }
    ((y - top) / h).clamp(0.0, 1.0)
}

/// Which sections changed touch state in the last run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transition {
    pub entered: Vec<String>,
    pub left: Vec<String>,
}

impl Transition {
    pub fn is_empty(&self) -> bool {
        self.entered.is_empty() && self.left.is_empty()
    }
}

#[derive(Debug)]
pub struct BoundaryDetector {
    registry: SectionRegistry,
    base_offset_fraction: f32,
    debug: bool,
    hits: Vec<SectionHit>,
    touched: Vec<bool>,
    transition: Transition,
    light_y: f32,
    active: Option<usize>,
}

impl BoundaryDetector {
    pub fn new(registry: SectionRegistry, base_offset_fraction: f32) -> Result<Self, ConfigError> {
        if !(base_offset_fraction.is_finite() && base_offset_fraction >= 0.0) {
            return Err(ConfigError::InvalidLightOffset(base_offset_fraction));
        }
        let n = registry.len();
        Ok(Self {
            registry,
            base_offset_fraction,
            debug: false,
            hits: Vec::with_capacity(n),
            touched: vec![false; n],
            transition: Transition::default(),
            light_y: 0.0,
            active: None,
        })
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    /// Resolve every section against the current state.
    ///
    /// Absent elements are skipped. Overlapping sections may all report
    /// touched; nothing here picks a winner.
    pub fn detect(&mut self, viewport: &dyn ViewportSource, state: &ScrollState) -> &[SectionHit] {
        let y = light_y(
            viewport.viewport_height(),
            self.base_offset_fraction,
            state.scroll_y,
            state.progress,
        );
        self.light_y = y;
        self.hits.clear();
        self.transition.entered.clear();
        self.transition.left.clear();

        let mut last_touched = None;
        for (i, id) in self.registry.ids.iter().enumerate() {
            let was = self.touched[i];
            let Some(rect) = viewport.bounding_rect(id) else {
                if self.debug {
                    log::debug!("[sections] not found: {}", id);
                }
                if was {
                    // Unmounted while lit.
                    self.touched[i] = false;
                    self.transition.left.push(id.clone());
                }
                continue;
            };
            let doc = rect.to_document(state.scroll_y);
            let touched = doc.top <= y && y <= doc.bottom;
            let p = local_progress(y, doc.top, doc.bottom);
            if touched {
                last_touched = Some(i);
                if self.debug {
                    log::debug!("[sections] light on {} ({:.1}%)", id, p * 100.0);
                }
            }
            match (was, touched) {
                (false, true) => self.transition.entered.push(id.clone()),
                (true, false) => self.transition.left.push(id.clone()),
                _ => {}
            }
            self.touched[i] = touched;
            self.hits.push(SectionHit {
                id: id.clone(),
                top: doc.top,
                bottom: doc.bottom,
                touched,
                local_progress: p,
            });
        }

        if last_touched != self.active {
            if self.debug {
                log::debug!(
                    "[sections] transition {} -> {}",
                    self.active.map(|i| self.registry.ids[i].as_str()).unwrap_or("none"),
                    last_touched.map(|i| self.registry.ids[i].as_str()).unwrap_or("none"),
                );
            }
            self.active = last_touched;
        }
        &self.hits
    }

    /// Hits from the last run.
    pub fn hits(&self) -> &[SectionHit] {
        &self.hits
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    /// Cursor position used by the last run.
    pub fn last_light_y(&self) -> f32 {
        self.light_y
    }

    /// Last touched section in list order, if any.
    pub fn active(&self) -> Option<&str> {
        self.active.map(|i| self.registry.ids[i].as_str())
    }
}
