//! Contact move handling: drag and pinch tracking.
//!
//! Nothing here reaches the document. Canvas gestures write the gesture
//! layer of the transform; selection gestures only update the live
//! translation or factor kept in the state.

use super::event::{ContactEvent, ContactId};
use super::state::{GestureState, PanTrack, PinchTrack};
use crate::canvas::Canvas;
use crate::constants::MIN_SCALE_FACTOR;
use crate::geometry::Vec2;
use crate::model::ElementId;
use tracing::debug;

impl Canvas {
    pub(crate) fn handle_contact_move(&mut self, event: ContactEvent) {
        let ContactEvent { contact, position, .. } = event;
        match self.gestures.contacts.get_mut(&contact) {
            Some(slot) => *slot = position,
            None => return,
        }

        let state = std::mem::take(&mut self.gestures.state);
        self.gestures.state = match state {
            GestureState::Pressed {
                contact: pressed,
                start,
                target,
                pending_tap,
            } if pressed == contact => {
                if position.distance(start) <= self.gestures.config.drag_slop {
                    GestureState::Pressed {
                        contact: pressed,
                        start,
                        target,
                        pending_tap,
                    }
                } else {
                    if let Some(tap) = pending_tap {
                        self.commit_tap(tap);
                    }
                    self.begin_drag(contact, start, target, position)
                }
            }
            GestureState::CanvasPanZoom { pan, pinch } => {
                match (pan, pinch) {
                    (_, Some(pinch)) => self.track_canvas_pinch(&pinch),
                    (Some(pan), None) if pan.contact == contact => self.track_pan(&pan, position),
                    _ => {}
                }
                GestureState::CanvasPanZoom { pan, pinch }
            }
            GestureState::SelectionDrag {
                contact: dragging,
                start,
                ..
            } if dragging == contact => GestureState::SelectionDrag {
                contact: dragging,
                start,
                translation: self.transform.get().delta_to_document(position - start),
            },
            GestureState::SelectionPinch {
                contacts,
                initial_distance,
                factor,
            } if contacts.contains(&contact) => GestureState::SelectionPinch {
                contacts,
                initial_distance,
                factor: self
                    .gestures
                    .pair(contacts)
                    .map(|(a, b)| (a.distance(b) / initial_distance).max(MIN_SCALE_FACTOR))
                    .unwrap_or(factor),
            },
            other => other,
        };
    }

    /// A press moved past the slop. On a selected element it drags the
    /// selection, anywhere else it pans the canvas.
    fn begin_drag(&mut self, contact: ContactId, start: Vec2, target: Option<ElementId>, position: Vec2) -> GestureState {
        let on_selection = target.is_some_and(|id| self.selection.get().contains(id));
        if on_selection {
            debug!(selected = self.selection.get().len(), "Selection drag started");
            return GestureState::SelectionDrag {
                contact,
                start,
                translation: self.transform.get().delta_to_document(position - start),
            };
        }
        let pan = PanTrack {
            contact,
            anchor: start,
            base: self.transform.get().gesture_pan(),
        };
        self.track_pan(&pan, position);
        GestureState::CanvasPanZoom {
            pan: Some(pan),
            pinch: None,
        }
    }

    pub(crate) fn track_pan(&mut self, pan: &PanTrack, position: Vec2) {
        let PanTrack { anchor, base, .. } = *pan;
        self.transform
            .update(|t| t.set_gesture_pan(base + t.delta_to_document(position - anchor)));
    }

    fn track_canvas_pinch(&mut self, pinch: &PinchTrack) {
        let Some((a, b)) = self.gestures.pair(pinch.contacts) else {
            return;
        };
        let PinchTrack {
            initial_distance,
            anchor,
            base,
            ..
        } = *pinch;
        self.transform.update(|t| {
            t.set_gesture_zoom(a.distance(b) / initial_distance);
            t.set_gesture_pan(base + t.delta_to_document(a.midpoint(b) - anchor));
        });
    }
}
