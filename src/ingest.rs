//! Drop and paste handling.
//!
//! Images and image links replace the background and fit it to the view.
//! Text drops place its first glyph where it landed, sized so it appears at
//! the default size whatever the current zoom.

use crate::canvas::{Canvas, skip_invalid_geometry};
use crate::error::CanvasResult;
use crate::fetch::image_url;
use crate::geometry::{ContainerSize, Vec2};
use crate::model::{BackgroundSource, ElementId};
use crate::palette::first_glyph;
use tracing::{debug, info};

/// Something handed to the canvas from outside: a drop or a paste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalPayload {
    ImageBytes(Vec<u8>),
    Uri(String),
    Glyphs(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The background was set; `changed` is false when it was already the
    /// same source
    Background { changed: bool },
    Added(ElementId),
    Skipped,
}

impl Canvas {
    /// Accept a dropped or pasted payload at a screen position.
    pub fn handle_external_payload(
        &mut self,
        payload: ExternalPayload,
        at_screen: Vec2,
        container: ContainerSize,
    ) -> CanvasResult<IngestOutcome> {
        if container.is_degenerate() {
            debug!(width = container.width, height = container.height, "Drop on empty container skipped");
            return Ok(IngestOutcome::Skipped);
        }
        self.set_container_size(container);

        match payload {
            ExternalPayload::ImageBytes(bytes) if bytes.is_empty() => Ok(IngestOutcome::Skipped),
            ExternalPayload::ImageBytes(bytes) => {
                info!(bytes = bytes.len(), "Image dropped");
                let changed = self.set_background(BackgroundSource::image_data(bytes), true);
                Ok(IngestOutcome::Background { changed })
            }
            ExternalPayload::Uri(uri) => {
                let uri = uri.trim();
                if uri.is_empty() {
                    return Ok(IngestOutcome::Skipped);
                }
                info!(%uri, "Image link dropped");
                let changed = self.set_background(BackgroundSource::url(image_url(uri)), true);
                Ok(IngestOutcome::Background { changed })
            }
            ExternalPayload::Glyphs(text) => {
                let Some(glyph) = first_glyph(&text) else {
                    debug!("Dropped text has no usable glyph");
                    return Ok(IngestOutcome::Skipped);
                };
                let Some(at) = skip_invalid_geometry(self.document_point_at(at_screen))? else {
                    return Ok(IngestOutcome::Skipped);
                };
                let size = self.drop_glyph_size();
                let id = self.add_element(glyph, at, size)?;
                Ok(IngestOutcome::Added(id))
            }
        }
    }
}
