//! Crate-wide constants.
//!
//! Centralizes magic numbers so the gesture, history and fetch code read
//! against named values. Most of these are only defaults: the live values
//! come from [`CanvasSettings`](crate::settings::CanvasSettings).

// ============================================================================
// Glyph Defaults
// ============================================================================

/// Font size given to a dropped glyph at zoom 1.0
pub const DEFAULT_GLYPH_SIZE: i32 = 40;

/// Smallest size a glyph can be scaled down to
pub const MIN_GLYPH_SIZE: i32 = 1;

/// Side of an element's hit frame relative to its font size
pub const HIT_FRAME_FACTOR: f32 = 1.2;

// ============================================================================
// Gesture Recognition
// ============================================================================

/// Time window in which a second tap turns into a double tap
pub const DOUBLE_TAP_WINDOW_MS: u64 = 300;

/// Maximum distance between the two taps of a double tap (screen px)
pub const DOUBLE_TAP_RADIUS: f32 = 40.0;

/// Distance a contact must travel before a press becomes a drag (screen px)
pub const DRAG_SLOP: f32 = 10.0;

/// Two contacts closer than this cannot produce a meaningful pinch ratio
pub const MIN_PINCH_DISTANCE: f32 = 1.0;

/// Lower bound applied to any pinch factor so scales stay strictly positive
pub const MIN_SCALE_FACTOR: f32 = 0.01;

// ============================================================================
// Zoom & Pan
// ============================================================================

/// Minimum steady zoom level
pub const MIN_ZOOM: f32 = 0.01;

/// Maximum steady zoom level
pub const MAX_ZOOM: f32 = 100.0;

/// Default zoom level
pub const DEFAULT_ZOOM: f32 = 1.0;

// ============================================================================
// History & Background Work
// ============================================================================

/// Maximum undo entries to keep
pub const MAX_HISTORY_OPERATIONS: usize = 100;

/// Worker threads resolving background images
pub const DEFAULT_FETCH_WORKERS: usize = 2;
