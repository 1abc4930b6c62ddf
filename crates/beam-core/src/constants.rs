// Shared scroll/light tuning constants used by the core and the web frontend.

// Smooth scrolling
pub const SMOOTH_DURATION_SEC: f32 = 2.5; // time for the damped offset to reach a new target
pub const WHEEL_MULTIPLIER: f32 = 0.8; // mouse wheel sensitivity
pub const TOUCH_MULTIPLIER: f32 = 1.5; // touch drag sensitivity

// Scroll state
pub const SCROLLING_VELOCITY_EPSILON: f32 = 0.1; // |px per frame| above which we are "scrolling"
pub const RAW_SCROLL_DEBOUNCE_MS: f64 = 150.0; // fallback mode: idle after this long without movement
pub const MAX_FRAME_DT_SEC: f32 = 0.1; // clamp for long frames (tab switch, debugger)

// Illumination cursor
pub const LIGHT_BASE_OFFSET_FRACTION: f32 = 0.9; // cursor starts at 90% of the viewport height

// Section light reactions
pub const SECTION_MIN_INTENSITY: f32 = 0.1; // floor for a touched section's glow
pub const SECTION_ENTER_THRESHOLD: f32 = 0.1;
pub const SECTION_ENTERING_END: f32 = 0.3;
pub const SECTION_LEAVING_START: f32 = 0.7;

// Path geometry
pub const CURVE_FLATTEN_STEPS: usize = 16; // polyline samples for quadratic length
pub const PATH_DECIMALS: usize = 2; // precision of emitted SVG path coordinates

// Default page layout: the sections the light travels through, hero excluded
pub const DEFAULT_SECTIONS: [&str; 5] = ["sobre-mí", "timeline", "habilidades", "proyectos", "contacto"];
pub const DEFAULT_BRANCH_X: f32 = 240.0; // px from the spine to each section's branch tip
