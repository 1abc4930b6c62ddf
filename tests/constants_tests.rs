// Host-side tests for the page wiring constants.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
fn element_ids_are_distinct_and_non_empty() {
    let ids = [SVG_ID, DEBUG_HUD_ID, CONFIG_SCRIPT_ID];
    for (i, a) in ids.iter().enumerate() {
        assert!(!a.is_empty());
        assert!(!a.contains(' '), "{:?} is not a valid id", a);
        for b in &ids[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn generated_element_classes_differ() {
    assert_ne!(BASE_PATH_CLASS, LIT_PATH_CLASS);
    assert_ne!(LIT_PATH_CLASS, WAYPOINT_CLASS);
    assert!(WAYPOINT_RADIUS_PX > 0.0);
}

#[test]
fn section_styling_names_are_well_formed() {
    assert!(SECTION_LIGHT_ATTR.starts_with("data-"));
    assert!(SECTION_INTENSITY_VAR.starts_with("--"));
    assert!(SECTION_PROGRESS_VAR.starts_with("--"));
    assert_ne!(SECTION_INTENSITY_VAR, SECTION_PROGRESS_VAR);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn wheel_constants_match_the_dom() {
    // DOM_DELTA_PIXEL = 0, DOM_DELTA_LINE = 1, DOM_DELTA_PAGE = 2
    assert_eq!(WHEEL_DELTA_LINE, 1);
    assert_eq!(WHEEL_DELTA_PAGE, 2);
    assert!(WHEEL_LINE_HEIGHT_PX > 0.0);
}

#[test]
fn svg_namespace() {
    assert_eq!(SVG_NS, "http://www.w3.org/2000/svg");
    assert!(REDUCED_MOTION_QUERY.contains("prefers-reduced-motion"));
}
