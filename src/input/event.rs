//! Abstract contact events.
//!
//! Hosts translate their touch or pointer events into [`ContactEvent`]s.
//! A mouse is a single contact; each finger on a touch screen is its own.

use crate::geometry::Vec2;
use std::fmt;
use std::time::Duration;

/// Identifies one finger or pointer for the lifetime of a touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContactId(pub u64);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "contact {}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    Down,
    Move,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    pub contact: ContactId,
    pub phase: ContactPhase,
    /// Screen position
    pub position: Vec2,
    /// Monotonic timestamp
    pub at: Duration,
}

impl ContactEvent {
    pub fn new(contact: u64, phase: ContactPhase, x: f32, y: f32, at: Duration) -> Self {
        Self {
            contact: ContactId(contact),
            phase,
            position: Vec2::new(x, y),
            at,
        }
    }

    pub fn down(contact: u64, x: f32, y: f32, at: Duration) -> Self {
        Self::new(contact, ContactPhase::Down, x, y, at)
    }

    pub fn moved(contact: u64, x: f32, y: f32, at: Duration) -> Self {
        Self::new(contact, ContactPhase::Move, x, y, at)
    }

    pub fn up(contact: u64, x: f32, y: f32, at: Duration) -> Self {
        Self::new(contact, ContactPhase::Up, x, y, at)
    }
}
