//! Contact down handling.

use super::event::{ContactEvent, ContactId};
use super::state::{GestureState, PanTrack, PendingTap, PinchTrack};
use crate::canvas::Canvas;
use crate::constants::MIN_PINCH_DISTANCE;
use crate::geometry::Vec2;
use std::time::Duration;
use tracing::debug;

impl Canvas {
    pub(crate) fn handle_contact_down(&mut self, event: ContactEvent) {
        let ContactEvent {
            contact,
            position,
            at,
            ..
        } = event;
        self.gestures.contacts.insert(contact, position);

        let state = std::mem::take(&mut self.gestures.state);
        self.gestures.state = match state {
            GestureState::Idle => self.press(contact, position, None, at),
            GestureState::TapPending(tap) => self.press(contact, position, Some(tap), at),
            GestureState::Pressed {
                contact: first,
                pending_tap,
                ..
            } => {
                if let Some(tap) = pending_tap {
                    self.commit_tap(tap);
                }
                if self.selection.get().is_empty() {
                    self.begin_canvas_pinch([first, contact])
                } else {
                    self.begin_selection_pinch([first, contact])
                }
            }
            GestureState::CanvasPanZoom {
                pan: Some(pan),
                pinch: None,
            } => self.begin_canvas_pinch([pan.contact, contact]),
            other => {
                debug!(%contact, state = other.name(), "Extra contact ignored");
                other
            }
        };
    }

    fn press(&mut self, contact: ContactId, start: Vec2, pending_tap: Option<PendingTap>, at: Duration) -> GestureState {
        let pending_tap = match pending_tap {
            Some(tap) if self.gestures.tap_expired(&tap, at) => {
                self.commit_tap(tap);
                None
            }
            other => other,
        };
        GestureState::Pressed {
            contact,
            start,
            target: self.hit_test(start),
            pending_tap,
        }
    }

    fn pinch_distance(&self, contacts: [ContactId; 2]) -> Option<(f32, Vec2)> {
        let (a, b) = self.gestures.pair(contacts)?;
        Some((a.distance(b).max(MIN_PINCH_DISTANCE), a.midpoint(b)))
    }

    fn begin_canvas_pinch(&mut self, contacts: [ContactId; 2]) -> GestureState {
        let Some((initial_distance, anchor)) = self.pinch_distance(contacts) else {
            return self.gestures.resting_state();
        };
        GestureState::CanvasPanZoom {
            pan: None,
            pinch: Some(PinchTrack {
                contacts,
                initial_distance,
                anchor,
                base: self.transform.get().gesture_pan(),
            }),
        }
    }

    /// Restart canvas pan or pinch tracking from where the contacts are now.
    /// Called after the view was reset under a live gesture, so the next
    /// move does not replay the movement made before the reset.
    pub(crate) fn reanchor_canvas_gesture(&mut self) {
        let GestureState::CanvasPanZoom { pan, pinch } = self.gestures.state else {
            return;
        };
        let base = self.transform.get().gesture_pan();
        let pan = pan.map(|track| PanTrack {
            anchor: self.gestures.position(track.contact).unwrap_or(track.anchor),
            base,
            ..track
        });
        let pinch = pinch.map(|track| match self.pinch_distance(track.contacts) {
            Some((initial_distance, anchor)) => PinchTrack {
                initial_distance,
                anchor,
                base,
                ..track
            },
            None => track,
        });
        debug!("Canvas gesture re-anchored after view reset");
        self.gestures.state = GestureState::CanvasPanZoom { pan, pinch };
    }

    fn begin_selection_pinch(&mut self, contacts: [ContactId; 2]) -> GestureState {
        let Some((initial_distance, _)) = self.pinch_distance(contacts) else {
            return self.gestures.resting_state();
        };
        debug!(selected = self.selection.get().len(), "Selection pinch started");
        GestureState::SelectionPinch {
            contacts,
            initial_distance,
            factor: 1.0,
        }
    }
}
