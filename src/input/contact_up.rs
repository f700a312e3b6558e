//! Contact up handling: finishing gestures.
//!
//! This is where a continuous gesture turns into its single command. Canvas
//! pan/zoom folds its gesture layer into the steady view instead and
//! pushes nothing.

use super::event::ContactEvent;
use super::state::{GestureState, PanTrack, PendingTap};
use crate::canvas::Canvas;
use crate::transform::TransformState;
use tracing::debug;

impl Canvas {
    pub(crate) fn handle_contact_up(&mut self, event: ContactEvent) {
        let ContactEvent {
            contact,
            position,
            at,
            ..
        } = event;
        if self.gestures.contacts.remove(&contact).is_none() {
            debug!(%contact, "Up for unknown contact ignored");
            return;
        }

        let state = std::mem::take(&mut self.gestures.state);
        self.gestures.state = match state {
            GestureState::Pressed {
                contact: pressed,
                start,
                target,
                pending_tap,
            } if pressed == contact => {
                let tap = PendingTap {
                    position: start,
                    at,
                    target,
                };
                self.finish_tap(tap, pending_tap)
            }
            GestureState::CanvasPanZoom {
                pinch: Some(pinch), ..
            } if pinch.involves(contact) => {
                // The remaining finger keeps panning from where it is.
                self.transform.update(TransformState::commit_gesture_zoom);
                let remaining = pinch
                    .partner_of(contact)
                    .and_then(|partner| Some((partner, self.gestures.position(partner)?)));
                match remaining {
                    Some((partner, anchor)) => GestureState::CanvasPanZoom {
                        pan: Some(PanTrack {
                            contact: partner,
                            anchor,
                            base: self.transform.get().gesture_pan(),
                        }),
                        pinch: None,
                    },
                    None => {
                        self.transform.update(TransformState::commit_gesture);
                        self.gestures.resting_state()
                    }
                }
            }
            GestureState::CanvasPanZoom {
                pan: Some(pan),
                pinch: None,
            } if pan.contact == contact => {
                self.track_pan(&pan, position);
                self.transform.update(TransformState::commit_gesture);
                self.gestures.resting_state()
            }
            GestureState::SelectionDrag {
                contact: dragging,
                start,
                ..
            } if dragging == contact => {
                let translation = self.transform.get().delta_to_document(position - start);
                let ids = self.selection.get().to_vec();
                if !self.move_elements(&ids, translation.truncate()) {
                    debug!("Selection drag ended without net movement");
                }
                self.gestures.resting_state()
            }
            GestureState::SelectionPinch { contacts, factor, .. } if contacts.contains(&contact) => {
                let ids = self.selection.get().to_vec();
                if !self.scale_elements(&ids, factor) {
                    debug!("Selection pinch ended without scaling");
                }
                self.gestures.resting_state()
            }
            GestureState::AwaitingRelease => self.gestures.resting_state(),
            other => other,
        };
    }
}
