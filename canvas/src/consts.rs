//! Shared numeric constants for the canvas crate.

// ── Geometry ────────────────────────────────────────────────────

/// Length of each arrowhead wing in world units.
pub const ARROW_HEAD_LENGTH: f64 = 15.0;

/// Angle between each arrowhead wing and the reversed shaft (30°).
pub const ARROW_HEAD_ANGLE: f64 = std::f64::consts::FRAC_PI_6;

// ── Hit-testing ─────────────────────────────────────────────────

/// Lines and arrows are hit when the pointer is strictly closer than this.
pub const EDGE_HIT_TOLERANCE: f64 = 10.0;

/// Pencil strokes are hit when the pointer is strictly closer than this to a sample.
pub const PENCIL_HIT_TOLERANCE: f64 = 10.0;

/// Fixed width of the text hit box; text is never measured.
pub const TEXT_HIT_WIDTH: f64 = 200.0;

// ── Shape defaults ──────────────────────────────────────────────

pub const DEFAULT_COLOR: &str = "#000000";
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;
pub const DEFAULT_FONT_SIZE: f64 = 16.0;
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Content given to a freshly placed text shape.
pub const NEW_TEXT_CONTENT: &str = "Text";

// ── Editor chrome ───────────────────────────────────────────────

/// Background grid spacing in world units.
pub const GRID_SIZE: f64 = 20.0;
pub const GRID_LINE_WIDTH: f64 = 0.5;
pub const GRID_COLOR: &str = "#e5e7eb";

pub const SELECTION_COLOR: &str = "#3b82f6";
pub const SELECTION_LINE_WIDTH: f64 = 2.0;

/// Dash and gap length of the selection outline.
pub const SELECTION_DASH: f64 = 5.0;

/// Gap between a shape's bounds and its selection outline.
pub const SELECTION_PADDING: f64 = 5.0;

/// Rotation applied by one press of the rotate control, in degrees.
pub const ROTATE_STEP_DEG: f64 = 45.0;
