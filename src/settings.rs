//! Canvas settings.
//!
//! Settings are a JSON file. Missing fields take their defaults, so an empty
//! object is a valid settings file.

use crate::constants::{
    DEFAULT_FETCH_WORKERS, DEFAULT_GLYPH_SIZE, DOUBLE_TAP_RADIUS, DOUBLE_TAP_WINDOW_MS, DRAG_SLOP,
    MAX_HISTORY_OPERATIONS, MAX_ZOOM, MIN_GLYPH_SIZE, MIN_ZOOM,
};
use crate::error::CanvasResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    /// Font size of a dropped glyph at zoom 1.0
    pub default_glyph_size: i32,
    pub min_glyph_size: i32,
    pub double_tap_window_ms: u64,
    /// Screen distance allowed between the two taps of a double tap
    pub double_tap_radius: f32,
    /// Screen distance a press must travel to become a drag
    pub drag_slop: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub max_history: usize,
    pub fetch_workers: usize,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            default_glyph_size: DEFAULT_GLYPH_SIZE,
            min_glyph_size: MIN_GLYPH_SIZE,
            double_tap_window_ms: DOUBLE_TAP_WINDOW_MS,
            double_tap_radius: DOUBLE_TAP_RADIUS,
            drag_slop: DRAG_SLOP,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            max_history: MAX_HISTORY_OPERATIONS,
            fetch_workers: DEFAULT_FETCH_WORKERS,
        }
    }
}

impl CanvasSettings {
    pub fn load(path: &Path) -> CanvasResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str::<Self>(&json)?.sanitized())
    }

    /// Load from `path`, falling back to defaults when the file is missing
    /// or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::debug!("Using default settings ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> CanvasResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn double_tap_window(&self) -> Duration {
        Duration::from_millis(self.double_tap_window_ms)
    }

    /// Replace out-of-range values with defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.default_glyph_size < 1 {
            self.default_glyph_size = defaults.default_glyph_size;
        }
        if self.min_glyph_size < 1 {
            self.min_glyph_size = defaults.min_glyph_size;
        }
        if !(self.double_tap_radius.is_finite() && self.double_tap_radius >= 0.0) {
            self.double_tap_radius = defaults.double_tap_radius;
        }
        if !(self.drag_slop.is_finite() && self.drag_slop >= 0.0) {
            self.drag_slop = defaults.drag_slop;
        }
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom && self.max_zoom.is_finite()) {
            self.min_zoom = defaults.min_zoom;
            self.max_zoom = defaults.max_zoom;
        }
        self.max_history = self.max_history.max(1);
        self.fetch_workers = self.fetch_workers.max(1);
        self
    }
}

/// Default location of the settings file.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("glyphboard").join("settings.json"))
}
