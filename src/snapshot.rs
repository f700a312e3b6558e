//! Persistence format for a document.
//!
//! The persistence collaborator stores and restores the whole document as
//! one snapshot:
//!
//! ```text
//! { "background": { "kind": "url", "url": "..." },
//!   "elements": [ { "id": 0, "glyph": "🚀", "x": -50, "y": -50, "size": 40 } ] }
//! ```
//!
//! Raw image bytes are base64-encoded so the snapshot stays plain JSON.

use crate::constants::MIN_GLYPH_SIZE;
use crate::error::CanvasResult;
use crate::geometry::DocPoint;
use crate::model::{BackgroundSource, DocumentModel, ElementId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

/// Serialized form of one element. Stacking order is the array order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub id: ElementId,
    pub glyph: String,
    pub x: i32,
    pub y: i32,
    pub size: i32,
}

/// Whole-document snapshot exchanged with the persistence collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    #[serde(default)]
    pub background: BackgroundSource,
    #[serde(default)]
    pub elements: Vec<ElementRecord>,
}

impl DocumentSnapshot {
    pub fn from_model(model: &DocumentModel) -> Self {
        Self {
            background: model.background().clone(),
            elements: model
                .elements()
                .iter()
                .map(|e| ElementRecord {
                    id: e.id,
                    glyph: e.glyph.clone(),
                    x: e.position.x,
                    y: e.position.y,
                    size: e.size,
                })
                .collect(),
        }
    }

    /// Convert into a model. Records with a duplicate id or an empty glyph
    /// are dropped, sizes are clamped to the minimum glyph size.
    pub fn into_model(self) -> DocumentModel {
        let mut seen = HashSet::new();
        let mut parts = Vec::with_capacity(self.elements.len());
        for record in self.elements {
            // The largest id leaves no fresh id to mint after it.
            if record.glyph.is_empty() || record.id.0 == u64::MAX || !seen.insert(record.id) {
                warn!(id = %record.id, "Dropping invalid element record from snapshot");
                continue;
            }
            parts.push((
                record.id,
                record.glyph,
                DocPoint::new(record.x, record.y),
                record.size.max(MIN_GLYPH_SIZE),
            ));
        }
        DocumentModel::from_parts(self.background, parts)
    }

    pub fn to_json(&self) -> CanvasResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> CanvasResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: &Path) -> CanvasResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> CanvasResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Serde adapter storing byte buffers as base64 strings.
pub mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
