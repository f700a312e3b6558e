//! Gesture state machine.
//!
//! One explicit state instead of a set of recognizers that have to be told
//! about each other. Pan/zoom and selection gestures are exclusive because
//! only one state exists at a time.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Pressed                  (first contact down)
//! TapPending -> Pressed            (contact down while a tap waits for its twin)
//! Pressed -> TapPending            (lift inside the drag slop)
//! Pressed -> Idle                  (second tap of a double tap, fit to screen)
//! Pressed -> SelectionDrag         (moved past the slop, started on a selected element)
//! Pressed -> CanvasPanZoom         (moved past the slop elsewhere)
//! Pressed -> SelectionPinch        (second contact down, selection not empty)
//! Pressed -> CanvasPanZoom         (second contact down, selection empty)
//! CanvasPanZoom(pan) -> CanvasPanZoom(pinch)   (second contact down)
//! CanvasPanZoom(pinch) -> CanvasPanZoom(pan)   (one contact up, zoom committed)
//! TapPending -> Idle               (tick past the double-tap window)
//!
//! Any gesture -> Idle              (last contact up, commits)
//! Any gesture -> AwaitingRelease   (gesture ended or cancelled with contacts still down)
//! AwaitingRelease -> Idle          (last contact up)
//! ```

use super::event::ContactId;
use crate::geometry::Vec2;
use crate::model::ElementId;
use crate::settings::CanvasSettings;
use std::collections::BTreeMap;
use std::time::Duration;

/// A completed single tap held back until it is clear no second tap follows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingTap {
    pub position: Vec2,
    /// When the contact lifted
    pub at: Duration,
    /// Element under the tap when it went down
    pub target: Option<ElementId>,
}

/// One-finger canvas pan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanTrack {
    pub contact: ContactId,
    /// Screen position the translation is measured from
    pub anchor: Vec2,
    /// Gesture pan (document units) when the anchor was taken
    pub base: Vec2,
}

/// Two-finger canvas pinch. The midpoint pans while the distance zooms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchTrack {
    pub contacts: [ContactId; 2],
    pub initial_distance: f32,
    pub anchor: Vec2,
    pub base: Vec2,
}

impl PinchTrack {
    pub fn involves(&self, contact: ContactId) -> bool {
        self.contacts.contains(&contact)
    }

    /// The other contact of the pair.
    pub fn partner_of(&self, contact: ContactId) -> Option<ContactId> {
        match self.contacts {
            [a, b] if a == contact => Some(b),
            [a, b] if b == contact => Some(a),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum GestureState {
    /// No contact down
    #[default]
    Idle,

    /// One contact down that has not moved past the drag slop yet
    Pressed {
        contact: ContactId,
        start: Vec2,
        target: Option<ElementId>,
        /// Earlier tap this press may turn into a double tap with
        pending_tap: Option<PendingTap>,
    },

    /// A tap waiting out the double-tap window
    TapPending(PendingTap),

    /// Canvas pan and/or pinch, moving only the gesture layer of the view.
    /// When `pinch` is active the pinch midpoint drives the pan and `pan`
    /// is `None`.
    CanvasPanZoom {
        pan: Option<PanTrack>,
        pinch: Option<PinchTrack>,
    },

    /// Dragging the selected elements
    SelectionDrag {
        contact: ContactId,
        start: Vec2,
        /// Running translation in document units
        translation: Vec2,
    },

    /// Pinching the selected elements
    SelectionPinch {
        contacts: [ContactId; 2],
        initial_distance: f32,
        factor: f32,
    },

    /// Gesture over, contacts still down are ignored until lifted
    AwaitingRelease,
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_pressed(&self) -> bool {
        matches!(self, Self::Pressed { .. })
    }

    /// Returns true if a pan, pinch or selection gesture is in flight
    pub fn is_gesture(&self) -> bool {
        matches!(
            self,
            Self::CanvasPanZoom { .. } | Self::SelectionDrag { .. } | Self::SelectionPinch { .. }
        )
    }

    pub fn is_canvas_pinch(&self) -> bool {
        matches!(self, Self::CanvasPanZoom { pinch: Some(_), .. })
    }

    /// Live selection drag translation in document units.
    pub fn selection_translation(&self) -> Option<Vec2> {
        match self {
            Self::SelectionDrag { translation, .. } => Some(*translation),
            _ => None,
        }
    }

    /// Live selection pinch factor.
    pub fn selection_factor(&self) -> Option<f32> {
        match self {
            Self::SelectionPinch { factor, .. } => Some(*factor),
            _ => None,
        }
    }

    pub fn pending_tap(&self) -> Option<&PendingTap> {
        match self {
            Self::TapPending(tap) => Some(tap),
            Self::Pressed { pending_tap, .. } => pending_tap.as_ref(),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pressed { .. } => "pressed",
            Self::TapPending(_) => "tap_pending",
            Self::CanvasPanZoom { .. } => "canvas_pan_zoom",
            Self::SelectionDrag { .. } => "selection_drag",
            Self::SelectionPinch { .. } => "selection_pinch",
            Self::AwaitingRelease => "awaiting_release",
        }
    }
}

/// Tunables taken from [`CanvasSettings`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    pub drag_slop: f32,
    pub double_tap_window: Duration,
    pub double_tap_radius: f32,
}

impl From<&CanvasSettings> for GestureConfig {
    fn from(settings: &CanvasSettings) -> Self {
        Self {
            drag_slop: settings.drag_slop,
            double_tap_window: settings.double_tap_window(),
            double_tap_radius: settings.double_tap_radius,
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self::from(&CanvasSettings::default())
    }
}

/// Gesture state plus the contacts currently down.
#[derive(Debug, Clone, Default)]
pub struct GestureCoordinator {
    pub(crate) state: GestureState,
    pub(crate) contacts: BTreeMap<ContactId, Vec2>,
    pub(crate) config: GestureConfig,
}

impl GestureCoordinator {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn config(&self) -> GestureConfig {
        self.config
    }

    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    pub fn position(&self, contact: ContactId) -> Option<Vec2> {
        self.contacts.get(&contact).copied()
    }

    /// Positions of both contacts of a pair, if both are still down.
    pub fn pair(&self, contacts: [ContactId; 2]) -> Option<(Vec2, Vec2)> {
        Some((self.position(contacts[0])?, self.position(contacts[1])?))
    }

    /// Whether a tap at `position` lifting at `at` completes a double tap
    /// with `first`.
    pub fn is_double_tap(&self, first: &PendingTap, position: Vec2, at: Duration) -> bool {
        at.saturating_sub(first.at) <= self.config.double_tap_window
            && first.position.distance(position) <= self.config.double_tap_radius
    }

    pub fn tap_expired(&self, tap: &PendingTap, now: Duration) -> bool {
        now.saturating_sub(tap.at) > self.config.double_tap_window
    }

    /// State to fall back to once a gesture ends.
    pub(crate) fn resting_state(&self) -> GestureState {
        if self.contacts.is_empty() {
            GestureState::Idle
        } else {
            GestureState::AwaitingRelease
        }
    }

    pub(crate) fn settle(&mut self) {
        self.state = self.resting_state();
    }
}
