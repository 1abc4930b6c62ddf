// DOM renderers. Both draw from the same per-frame [`FrameView`]; neither
// computes geometry or detection of its own.

use beam_core::path::Segment;
use beam_core::{FrameView, PathRenderer, SectionPhase};
use fnv::FnvHashMap;
use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::constants::{
    BASE_PATH_CLASS, LIT_PATH_CLASS, SECTION_INTENSITY_VAR, SECTION_LIGHT_ATTR, SECTION_PROGRESS_VAR,
    SVG_ID, WAYPOINT_CLASS, WAYPOINT_RADIUS_PX,
};
use crate::dom;

/// Draws the dim rails, the lit beam and the reached waypoint dots inside the
/// page's `<svg>`, one group each so the beam and dots always sit on top.
pub struct SvgPathRenderer {
    document: web::Document,
    base_group: web::Element,
    lit_group: web::Element,
    dot_group: web::Element,
    base: Vec<web::Element>,
    lit: Vec<web::Element>,
    dots: Vec<web::Element>,
}

impl SvgPathRenderer {
    pub fn new(document: &web::Document) -> anyhow::Result<Self> {
        let svg = document
            .get_element_by_id(SVG_ID)
            .ok_or_else(|| anyhow::anyhow!("missing #{}", SVG_ID))?;
        let base_group = dom::create_svg_element(document, "g")?;
        let lit_group = dom::create_svg_element(document, "g")?;
        let dot_group = dom::create_svg_element(document, "g")?;
        for g in [&base_group, &lit_group, &dot_group] {
            svg.append_child(g)
                .map_err(|e| anyhow::anyhow!("append group: {:?}", e))?;
        }
        Ok(Self {
            document: document.clone(),
            base_group,
            lit_group,
            dot_group,
            base: Vec::new(),
            lit: Vec::new(),
            dots: Vec::new(),
        })
    }
}

/// Make `pool` mirror `segments`: reuse existing paths, create missing ones,
/// drop the extras.
fn sync_paths(
    document: &web::Document,
    parent: &web::Element,
    pool: &mut Vec<web::Element>,
    segments: &[Segment],
    class: &str,
) -> anyhow::Result<()> {
    for (i, seg) in segments.iter().enumerate() {
        if i == pool.len() {
            let path = dom::create_svg_element(document, "path")?;
            _ = path.set_attribute("class", class);
            parent
                .append_child(&path)
                .map_err(|e| anyhow::anyhow!("append path: {:?}", e))?;
            pool.push(path);
        }
        let path = &pool[i];
        _ = path.set_attribute("d", &seg.d);
        _ = path.set_attribute("data-edge", &seg.edge_id);
    }
    for extra in pool.drain(segments.len()..) {
        extra.remove();
    }
    Ok(())
}

fn sync_dots(
    document: &web::Document,
    parent: &web::Element,
    pool: &mut Vec<web::Element>,
    points: &[Vec2],
) -> anyhow::Result<()> {
    for (i, p) in points.iter().enumerate() {
        if i == pool.len() {
            let dot = dom::create_svg_element(document, "circle")?;
            _ = dot.set_attribute("class", WAYPOINT_CLASS);
            _ = dot.set_attribute("r", &WAYPOINT_RADIUS_PX.to_string());
            parent
                .append_child(&dot)
                .map_err(|e| anyhow::anyhow!("append dot: {:?}", e))?;
            pool.push(dot);
        }
        let dot = &pool[i];
        _ = dot.set_attribute("cx", &format!("{:.2}", p.x));
        _ = dot.set_attribute("cy", &format!("{:.2}", p.y));
    }
    for extra in pool.drain(points.len()..) {
        extra.remove();
    }
    Ok(())
}

impl PathRenderer for SvgPathRenderer {
    fn render(&mut self, frame: &FrameView<'_>) -> anyhow::Result<()> {
        if frame.base_changed {
            sync_paths(&self.document, &self.base_group, &mut self.base, frame.base, BASE_PATH_CLASS)?;
        }
        sync_paths(&self.document, &self.lit_group, &mut self.lit, frame.lit, LIT_PATH_CLASS)?;
        // The reached set only grows or shrinks, so an unchanged count means
        // unchanged dots unless the layout moved them.
        if frame.base_changed || frame.waypoints.len() != self.dots.len() {
            sync_dots(&self.document, &self.dot_group, &mut self.dots, frame.waypoints)?;
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.base.clear();
        self.lit.clear();
        self.dots.clear();
        self.base_group.remove();
        self.lit_group.remove();
        self.dot_group.remove();
    }
}

/// Marks each section with its light phase and exposes intensity and local
/// progress as CSS custom properties, so the page's stylesheet decides how a
/// lit section looks.
pub struct SectionGlowRenderer {
    document: web::Document,
    applied: FnvHashMap<String, (SectionPhase, f32)>,
}

impl SectionGlowRenderer {
    pub fn new(document: &web::Document) -> Self {
        Self {
            document: document.clone(),
            applied: FnvHashMap::default(),
        }
    }

    fn section(&self, id: &str) -> Option<web::HtmlElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<web::HtmlElement>().ok())
    }
}

impl PathRenderer for SectionGlowRenderer {
    fn render(&mut self, frame: &FrameView<'_>) -> anyhow::Result<()> {
        for hit in frame.sections {
            let phase = hit.phase();
            let progress = (hit.local_progress * 100.0).round() / 100.0;
            if self.applied.get(&hit.id) == Some(&(phase, progress)) {
                continue;
            }
            let Some(el) = self.section(&hit.id) else {
                continue;
            };
            _ = el.set_attribute(SECTION_LIGHT_ATTR, phase.as_str());
            let style = el.style();
            _ = style.set_property(SECTION_INTENSITY_VAR, &format!("{:.2}", hit.intensity()));
            _ = style.set_property(SECTION_PROGRESS_VAR, &format!("{:.2}", progress));
            self.applied.insert(hit.id.clone(), (phase, progress));
        }
        Ok(())
    }

    fn clear(&mut self) {
        for id in self.applied.keys() {
            if let Some(el) = self.section(id) {
                _ = el.remove_attribute(SECTION_LIGHT_ATTR);
                let style = el.style();
                _ = style.remove_property(SECTION_INTENSITY_VAR);
                _ = style.remove_property(SECTION_PROGRESS_VAR);
            }
        }
        self.applied.clear();
    }
}
