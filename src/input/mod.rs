//! Contact input handling for the canvas.
//!
//! Hosts feed raw contact events in; this module decides what gesture they
//! form and drives the view transform and the command layer from it.
//!
//! ## Architecture
//!
//! The input system uses an explicit state machine (`GestureState`) to
//! track the current interaction. Continuous gestures only touch the
//! ephemeral layers (gesture pan/zoom, live selection offset and factor)
//! while they run, and reach the document through exactly one command when
//! they end.
//!
//! ## Modules
//!
//! - `event` - Abstract contact events
//! - `state` - Gesture state machine enum and helper methods
//! - `contact_down` - Press handling (tap candidates, pinch start)
//! - `contact_move` - Drag and pinch tracking
//! - `contact_up` - Gesture completion and commit
//! - `tap` - Single/double tap resolution and the tap timer
//! - `coords` - Screen/document coordinate conversion

mod contact_down;
mod contact_move;
mod contact_up;
pub mod coords;
mod event;
mod state;
mod tap;

pub use event::{ContactEvent, ContactId, ContactPhase};
pub use state::{GestureConfig, GestureCoordinator, GestureState, PanTrack, PendingTap, PinchTrack};

use crate::canvas::Canvas;
use crate::profile_scope;
use tracing::debug;

impl Canvas {
    /// Feed one contact event through the gesture state machine.
    pub fn handle_contact(&mut self, event: ContactEvent) {
        profile_scope!("handle_contact");
        let before = self.gestures.state().name();
        match event.phase {
            ContactPhase::Down => self.handle_contact_down(event),
            ContactPhase::Move => self.handle_contact_move(event),
            ContactPhase::Up => self.handle_contact_up(event),
        }
        let after = self.gestures.state().name();
        if before != after {
            debug!(from = before, to = after, contact = event.contact.0, "Gesture transition");
        }
    }

    /// Abandon the gesture in flight. Ephemeral state and any pending tap
    /// are discarded, no command is pushed and the steady view is untouched.
    pub fn cancel_gesture(&mut self) {
        debug!(state = self.gestures.state().name(), "Gesture cancelled");
        self.reset_gestures();
    }
}
