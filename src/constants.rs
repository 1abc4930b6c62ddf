// Page wiring constants shared by the DOM glue: element ids and attribute
// names the host page provides, plus the numbers that turn browser input
// into scroll deltas.

// Elements
pub const SVG_ID: &str = "beam-svg"; // <svg> overlay the rails are drawn into
pub const DEBUG_HUD_ID: &str = "scroll-debug"; // optional debug readout
pub const CONFIG_SCRIPT_ID: &str = "beam-config"; // <script type="application/json">

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

// Classes put on generated <path> elements
pub const BASE_PATH_CLASS: &str = "beam-rail";
pub const LIT_PATH_CLASS: &str = "beam-light";
pub const WAYPOINT_CLASS: &str = "beam-dot"; // <circle> per reached waypoint
pub const WAYPOINT_RADIUS_PX: f32 = 4.0;

// Attributes and custom properties written on section elements
pub const SECTION_LIGHT_ATTR: &str = "data-light"; // outside | entering | inside | leaving
pub const SECTION_INTENSITY_VAR: &str = "--light-intensity";
pub const SECTION_PROGRESS_VAR: &str = "--light-progress";

// WheelEvent.deltaMode
pub const WHEEL_DELTA_LINE: u32 = 1;
pub const WHEEL_DELTA_PAGE: u32 = 2;
pub const WHEEL_LINE_HEIGHT_PX: f32 = 16.0; // px per line in line mode

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
