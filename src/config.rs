use beam_core::BeamConfig;

/// Page config from the optional inline JSON script. Missing or broken config
/// falls back to the defaults; a broken one is logged.
pub fn parse_config(raw: Option<&str>) -> BeamConfig {
    let Some(text) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
        return BeamConfig::default();
    };
    match BeamConfig::from_json(text) {
        Ok(cfg) => cfg,
        Err(e) => {
            log::warn!("[beam] ignoring invalid page config: {}", e);
            BeamConfig::default()
        }
    }
}
