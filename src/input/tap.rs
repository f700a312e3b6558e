//! Tap resolution.
//!
//! A single tap is held in `TapPending` until the double-tap window runs
//! out, so a double tap never toggles the selection on its way to fitting
//! the view. Hosts drive the window with [`Canvas::tick`].

use super::state::{GestureState, PendingTap};
use crate::canvas::Canvas;
use std::time::Duration;
use tracing::debug;

impl Canvas {
    /// Advance the tap timer. A pending single tap whose window has passed
    /// takes effect here.
    pub fn tick(&mut self, now: Duration) {
        let Some(tap) = self.gestures.state.pending_tap().copied() else {
            return;
        };
        if !self.gestures.tap_expired(&tap, now) {
            return;
        }
        match &mut self.gestures.state {
            GestureState::Pressed { pending_tap, .. } => *pending_tap = None,
            state => *state = GestureState::Idle,
        }
        self.commit_tap(tap);
    }

    /// Resolve a completed tap against the one waiting, if any.
    pub(crate) fn finish_tap(&mut self, tap: PendingTap, pending: Option<PendingTap>) -> GestureState {
        match pending {
            Some(first) if self.gestures.is_double_tap(&first, tap.position, tap.at) => {
                self.handle_double_tap();
                self.gestures.resting_state()
            }
            Some(first) => {
                self.commit_tap(first);
                GestureState::TapPending(tap)
            }
            None => GestureState::TapPending(tap),
        }
    }

    /// Single tap: toggle the element under it, or clear the selection when
    /// it landed on the background.
    pub(crate) fn commit_tap(&mut self, tap: PendingTap) {
        match tap.target.filter(|id| self.document.get().contains(*id)) {
            Some(id) => {
                let selected = self.toggle_selection(id);
                debug!(%id, selected, "Tap toggled selection");
            }
            None => self.clear_selection(),
        }
    }

    fn handle_double_tap(&mut self) {
        if !self.fit_to_screen() {
            debug!("Double tap without a fitted background");
        }
    }
}
