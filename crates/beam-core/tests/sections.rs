// Section registry and boundary detection against an in-memory page.

use beam_core::scroll::ScrollState;
use beam_core::section::{light_y, local_progress};
use beam_core::{
    BoundaryDetector, ConfigError, MemoryViewport, SectionHit, SectionPhase, SectionRegistry,
    ViewportSource,
};

/// 1000px viewport over a 3000px document with three equal sections.
fn three_sections() -> MemoryViewport {
    MemoryViewport::new(1280.0, 1000.0, 3000.0)
        .with_section("a", 0.0, 1000.0)
        .with_section("b", 1000.0, 2000.0)
        .with_section("c", 2000.0, 3000.0)
}

fn detector(ids: &[&str], base: f32) -> BoundaryDetector {
    let registry = SectionRegistry::new(ids.iter().copied()).unwrap();
    BoundaryDetector::new(registry, base).unwrap()
}

/// Scroll the page to `progress` and run detection.
fn detect_at(det: &mut BoundaryDetector, vp: &MemoryViewport, progress: f32) -> Vec<SectionHit> {
    let y = progress * vp.scrollable_height();
    vp.set_scroll_y(y);
    let state = ScrollState {
        progress,
        velocity: 0.0,
        is_scrolling: false,
        scroll_y: y,
    };
    det.detect(vp, &state).to_vec()
}

fn touched(hits: &[SectionHit]) -> Vec<&str> {
    hits.iter().filter(|h| h.touched).map(|h| h.id.as_str()).collect()
}

#[test]
fn registry_rejects_duplicates_and_blanks() {
    assert!(matches!(
        SectionRegistry::new(["a", "b", "a"]),
        Err(ConfigError::DuplicateSection(id)) if id == "a"
    ));
    assert!(matches!(
        SectionRegistry::new(["a", " "]),
        Err(ConfigError::EmptySection(1))
    ));
    let reg = SectionRegistry::new(["x", "y"]).unwrap();
    assert_eq!(reg.len(), 2);
    assert_eq!(reg.position("y"), Some(1));
    assert_eq!(reg.position("z"), None);
}

#[test]
fn detector_rejects_bad_offset() {
    let reg = SectionRegistry::new(["a"]).unwrap();
    assert!(matches!(
        BoundaryDetector::new(reg.clone(), f32::NAN),
        Err(ConfigError::InvalidLightOffset(_))
    ));
    assert!(BoundaryDetector::new(reg, -0.5).is_err());
}

#[test]
fn light_cursor_formula() {
    assert_eq!(light_y(800.0, 0.9, 0.0, 0.0), 720.0);
    assert_eq!(light_y(800.0, 0.9, 1000.0, 0.5), 1220.0);
}

#[test]
fn local_progress_at_the_edges() {
    assert_eq!(local_progress(100.0, 100.0, 300.0), 0.0);
    assert_eq!(local_progress(300.0, 100.0, 300.0), 1.0);
    assert_eq!(local_progress(200.0, 100.0, 300.0), 0.5);
    assert_eq!(local_progress(50.0, 100.0, 300.0), 0.0);
    assert_eq!(local_progress(900.0, 100.0, 300.0), 1.0);
    // Zero height: fully traversed once reached.
    assert_eq!(local_progress(5.0, 5.0, 5.0), 1.0);
    assert_eq!(local_progress(4.0, 5.0, 5.0), 0.0);
}

#[test]
fn middle_section_is_lit_halfway_down() {
    let vp = three_sections();
    // Cursor at the viewport bottom: light_y = 1000 + 2000 * p^2.
    let mut det = detector(&["a", "b", "c"], 1.0);
    let hits = detect_at(&mut det, &vp, 0.5);

    assert_eq!(touched(&hits), vec!["b"]);
    let b = hits.iter().find(|h| h.id == "b").unwrap();
    assert!((b.local_progress - 0.5).abs() < 1e-4);
    assert_eq!(det.active(), Some("b"));
    assert_eq!(det.last_light_y(), 1500.0);
}

#[test]
fn touched_bounds_are_inclusive() {
    let vp = three_sections();
    let mut det = detector(&["a", "b", "c"], 1.0);
    vp.set_scroll_y(2000.0);
    let state = ScrollState {
        progress: 0.5,
        velocity: 0.0,
        is_scrolling: false,
        scroll_y: 2000.0,
    };
    // light_y = 1000 + 1000 lands exactly on the b/c seam.
    let hits = det.detect(&vp, &state).to_vec();
    assert_eq!(touched(&hits), vec!["b", "c"]);
    let b = &hits[1];
    let c = &hits[2];
    assert_eq!(b.local_progress, 1.0);
    assert_eq!(c.local_progress, 0.0);
    // Later in list order wins the active slot.
    assert_eq!(det.active(), Some("c"));
}

#[test]
fn adjacent_sections_light_one_at_a_time() {
    let vp = three_sections();
    let mut det = detector(&["a", "b", "c"], 1.0);
    for k in 1..=100 {
        let p = k as f32 / 100.0 - 0.005;
        let hits = detect_at(&mut det, &vp, p);
        assert!(touched(&hits).len() <= 1, "p={} lit {:?}", p, touched(&hits));
    }
}

#[test]
fn overlapping_sections_can_both_be_touched() {
    let vp = MemoryViewport::new(1280.0, 1000.0, 3000.0)
        .with_section("hero", 0.0, 2000.0)
        .with_section("about", 1000.0, 3000.0);
    let mut det = detector(&["hero", "about"], 1.0);
    let hits = detect_at(&mut det, &vp, 0.5);
    assert_eq!(touched(&hits), vec!["hero", "about"]);
}

#[test]
fn missing_sections_are_skipped() {
    let vp = three_sections();
    let mut det = detector(&["a", "ghost", "b"], 0.9).with_debug(true);
    let hits = detect_at(&mut det, &vp, 0.0);
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|h| h.id != "ghost"));
}

#[test]
fn rects_are_never_cached() {
    let vp = three_sections();
    let mut det = detector(&["a", "b", "c"], 1.0);
    assert_eq!(touched(&detect_at(&mut det, &vp, 0.5)), vec!["b"]);

    // Layout shift: b grows downward and c moves.
    vp.insert_section("a", 0.0, 1600.0);
    vp.insert_section("b", 1600.0, 2400.0);
    assert_eq!(touched(&detect_at(&mut det, &vp, 0.5)), vec!["a"]);
}

#[test]
fn transitions_follow_the_cursor() {
    let vp = three_sections();
    let mut det = detector(&["a", "b", "c"], 1.0);

    detect_at(&mut det, &vp, 0.3);
    assert_eq!(det.transition().entered, vec!["b".to_string()]);
    assert!(det.transition().left.is_empty());

    detect_at(&mut det, &vp, 0.4);
    assert!(det.transition().is_empty());

    detect_at(&mut det, &vp, 0.9);
    assert_eq!(det.transition().entered, vec!["c".to_string()]);
    assert_eq!(det.transition().left, vec!["b".to_string()]);
    assert_eq!(det.active(), Some("c"));
}

#[test]
fn unmounting_a_lit_section_counts_as_leaving() {
    let vp = three_sections();
    let mut det = detector(&["a", "b", "c"], 1.0);
    detect_at(&mut det, &vp, 0.5);
    assert!(vp.remove_section("b"));
    let hits = detect_at(&mut det, &vp, 0.5);
    assert!(touched(&hits).is_empty());
    assert_eq!(det.transition().left, vec!["b".to_string()]);
    assert_eq!(det.active(), None);
}

#[test]
fn intensity_and_phase() {
    let hit = |touched, local_progress| SectionHit {
        id: "s".into(),
        top: 0.0,
        bottom: 100.0,
        touched,
        local_progress,
    };
    assert_eq!(hit(true, 0.5).intensity(), 1.0);
    assert!((hit(true, 0.0).intensity() - 0.1).abs() < 1e-6);
    assert_eq!(hit(false, 0.5).intensity(), 0.0);

    assert_eq!(hit(false, 0.5).phase(), SectionPhase::Outside);
    assert_eq!(hit(true, 0.05).phase(), SectionPhase::Outside);
    assert_eq!(hit(true, 0.2).phase(), SectionPhase::Entering);
    assert_eq!(hit(true, 0.5).phase(), SectionPhase::Inside);
    assert_eq!(hit(true, 0.9).phase(), SectionPhase::Leaving);
}
