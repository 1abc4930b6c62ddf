// Host-side tests for reading the inline page config.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod config {
    include!("../src/config.rs");
}

use beam_core::BeamConfig;
use config::parse_config;

#[test]
fn missing_or_blank_config_uses_defaults() {
    assert_eq!(parse_config(None), BeamConfig::default());
    assert_eq!(parse_config(Some("")), BeamConfig::default());
    assert_eq!(parse_config(Some("  \n\t ")), BeamConfig::default());
}

#[test]
fn page_config_overrides_defaults() {
    let cfg = parse_config(Some(r#"{ "sections": ["hero", "work"], "debug": true }"#));
    assert_eq!(cfg.sections, vec!["hero".to_string(), "work".to_string()]);
    assert!(cfg.debug);
    assert_eq!(cfg.light_offset, BeamConfig::default().light_offset);
}

#[test]
fn broken_config_falls_back_to_defaults() {
    assert_eq!(parse_config(Some("{ sections: ")), BeamConfig::default());
    assert_eq!(parse_config(Some(r#"{"lightOffset": "high"}"#)), BeamConfig::default());
}
