//! Error types for canvas operations
//!
//! Provides unified error handling for coordinate mapping, command
//! construction, background resolution and settings IO.

use crate::model::ElementId;
use thiserror::Error;

/// Errors that can occur while operating on a canvas
#[derive(Error, Debug)]
pub enum CanvasError {
    /// The container has no area, so no mapping between spaces exists
    #[error("Invalid geometry: container is {width}x{height}")]
    InvalidGeometry { width: f32, height: f32 },

    /// A background image could not be resolved
    #[error("Background fetch failed: {url}")]
    FetchFailed { url: String },

    /// A command referenced an element that is not in the document
    #[error("Unknown element: {0}")]
    UnknownElement(ElementId),

    /// A glyph string was empty or not a printable character
    #[error("Invalid glyph: {0:?}")]
    InvalidGlyph(String),

    /// Image decoding error from the image crate
    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),

    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error from serde_json
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File watcher error from notify
    #[error("Watcher error: {0}")]
    Watcher(#[from] notify::Error),
}

/// Result type alias for canvas operations
pub type CanvasResult<T> = Result<T, CanvasError>;

impl CanvasError {
    /// Returns true for errors a gesture or drop handler should swallow
    /// by skipping the operation.
    pub fn is_skippable(&self) -> bool {
        matches!(self, Self::InvalidGeometry { .. })
    }
}
