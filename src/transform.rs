//! View transform - steady pan/zoom plus the ephemeral gesture layer.
//!
//! The steady layer is what the user sees between gestures and may be
//! persisted as view state. The gesture layer lives only while a pan or
//! pinch is in flight; it is folded into the steady layer when the gesture
//! ends and thrown away when it is cancelled. Neither layer is undoable.

use crate::constants::{DEFAULT_ZOOM, MAX_ZOOM, MIN_SCALE_FACTOR, MIN_ZOOM};
use crate::geometry::{ContainerSize, Vec2};
use serde::{Deserialize, Serialize};

/// Persistable steady view state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub zoom: f32,
    /// Pan offset in document units
    pub pan: Vec2,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            pan: Vec2::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformState {
    steady_zoom: f32,
    steady_pan: Vec2,
    gesture_zoom: f32,
    gesture_pan: Vec2,
    min_zoom: f32,
    max_zoom: f32,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            steady_zoom: DEFAULT_ZOOM,
            steady_pan: Vec2::ZERO,
            gesture_zoom: 1.0,
            gesture_pan: Vec2::ZERO,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }
}

impl TransformState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transform with the given steady layer and no gesture in flight.
    pub fn with_view(view: ViewState) -> Self {
        let mut transform = Self::default();
        transform.restore_view(view);
        transform
    }

    #[inline]
    pub fn steady_zoom(&self) -> f32 {
        self.steady_zoom
    }

    #[inline]
    pub fn steady_pan(&self) -> Vec2 {
        self.steady_pan
    }

    #[inline]
    pub fn gesture_zoom(&self) -> f32 {
        self.gesture_zoom
    }

    #[inline]
    pub fn gesture_pan(&self) -> Vec2 {
        self.gesture_pan
    }

    /// Zoom currently on screen, always strictly positive.
    #[inline]
    pub fn effective_zoom(&self) -> f32 {
        self.steady_zoom * self.gesture_zoom
    }

    /// Pan currently on screen, in screen pixels.
    #[inline]
    pub fn effective_pan(&self) -> Vec2 {
        (self.steady_pan + self.gesture_pan) * self.effective_zoom()
    }

    /// Convert a screen-space delta into document units at the current zoom.
    #[inline]
    pub fn delta_to_document(&self, delta: Vec2) -> Vec2 {
        delta / self.effective_zoom()
    }

    pub fn is_gesture_active(&self) -> bool {
        self.gesture_zoom != 1.0 || self.gesture_pan != Vec2::ZERO
    }

    pub fn zoom_bounds(&self) -> (f32, f32) {
        (self.min_zoom, self.max_zoom)
    }

    /// Change the allowed steady zoom range. Bounds that are not strictly
    /// positive and ordered are ignored.
    pub fn set_zoom_bounds(&mut self, min_zoom: f32, max_zoom: f32) {
        if !(min_zoom > 0.0 && min_zoom <= max_zoom && max_zoom.is_finite()) {
            return;
        }
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.steady_zoom = self.clamp_zoom(self.steady_zoom);
    }

    fn clamp_zoom(&self, zoom: f32) -> f32 {
        if zoom.is_finite() {
            zoom.clamp(self.min_zoom, self.max_zoom)
        } else {
            self.steady_zoom
        }
    }

    /// Set the live pinch factor. Non-finite input is ignored and the
    /// factor never drops to zero or below.
    pub fn set_gesture_zoom(&mut self, factor: f32) {
        if factor.is_finite() {
            self.gesture_zoom = factor.max(MIN_SCALE_FACTOR);
        }
    }

    /// Set the live pan offset in document units.
    pub fn set_gesture_pan(&mut self, pan: Vec2) {
        if pan.is_finite() {
            self.gesture_pan = pan;
        }
    }

    /// Fold the gesture zoom into the steady zoom, keeping the gesture pan.
    pub fn commit_gesture_zoom(&mut self) {
        self.steady_zoom = self.clamp_zoom(self.steady_zoom * self.gesture_zoom);
        self.gesture_zoom = 1.0;
    }

    /// Fold the whole gesture layer into the steady layer.
    pub fn commit_gesture(&mut self) {
        self.commit_gesture_zoom();
        self.steady_pan += self.gesture_pan;
        self.gesture_pan = Vec2::ZERO;
    }

    /// Discard the gesture layer, leaving the steady layer untouched.
    pub fn cancel_gesture(&mut self) {
        self.gesture_zoom = 1.0;
        self.gesture_pan = Vec2::ZERO;
    }

    /// Zoom so the whole image fits the container and recenter.
    /// Returns false when either size is degenerate.
    pub fn fit_to(&mut self, container: ContainerSize, image_width: u32, image_height: u32) -> bool {
        if container.is_degenerate() || image_width == 0 || image_height == 0 {
            return false;
        }
        let h_zoom = container.width / image_width as f32;
        let v_zoom = container.height / image_height as f32;
        self.cancel_gesture();
        self.steady_pan = Vec2::ZERO;
        self.steady_zoom = self.clamp_zoom(h_zoom.min(v_zoom));
        true
    }

    pub fn view_state(&self) -> ViewState {
        ViewState {
            zoom: self.steady_zoom,
            pan: self.steady_pan,
        }
    }

    pub fn restore_view(&mut self, view: ViewState) {
        self.cancel_gesture();
        self.steady_zoom = if view.zoom > 0.0 {
            self.clamp_zoom(view.zoom)
        } else {
            DEFAULT_ZOOM
        };
        self.steady_pan = if view.pan.is_finite() { view.pan } else { Vec2::ZERO };
    }
}
