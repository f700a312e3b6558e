//! Core document types.
//!
//! The [`DocumentModel`] is the only state the command layer mutates: a
//! background source plus the glyph elements placed on top of it, kept in
//! insertion order so stacking is deterministic.

use crate::geometry::DocPoint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Stable identifier of a placed element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A glyph placed on the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub id: ElementId,
    /// A single character, usually an emoji
    pub glyph: String,
    /// Center of the glyph in document space
    pub position: DocPoint,
    /// Font size in document units
    pub size: i32,
    /// Monotonic stacking key, higher is drawn on top
    pub insertion_order: u64,
}

/// Where the background image comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackgroundSource {
    #[default]
    None,
    ImageData {
        #[serde(with = "crate::snapshot::base64_bytes")]
        data: Vec<u8>,
    },
    Url {
        url: String,
    },
}

impl BackgroundSource {
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url { url: url.into() }
    }

    pub fn image_data(data: impl Into<Vec<u8>>) -> Self {
        Self::ImageData { data: data.into() }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// URL to report when resolution fails, `None` for raw bytes.
    pub fn url_str(&self) -> Option<&str> {
        match self {
            Self::Url { url } => Some(url),
            _ => None,
        }
    }

    /// Short description for logs, never the raw bytes.
    pub fn describe(&self) -> String {
        match self {
            Self::None => "none".to_string(),
            Self::ImageData { data } => format!("{} bytes of image data", data.len()),
            Self::Url { url } => url.clone(),
        }
    }
}

/// Background reference plus the ordered glyph elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentModel {
    background: BackgroundSource,
    elements: Vec<Element>,
    next_id: u64,
    next_order: u64,
}

impl DocumentModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a model from restored parts. Elements keep the given order,
    /// which becomes their insertion order.
    pub fn from_parts(background: BackgroundSource, elements: Vec<(ElementId, String, DocPoint, i32)>) -> Self {
        let mut model = Self {
            background,
            ..Self::default()
        };
        for (id, glyph, position, size) in elements {
            let insertion_order = model.next_order;
            model.next_order += 1;
            model.next_id = model.next_id.max(id.0.saturating_add(1));
            model.elements.push(Element {
                id,
                glyph,
                position,
                size,
                insertion_order,
            });
        }
        model
    }

    pub fn background(&self) -> &BackgroundSource {
        &self.background
    }

    /// Elements in stacking order, bottom first.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> BTreeSet<ElementId> {
        self.elements.iter().map(|e| e.id).collect()
    }

    /// Build a new element with a fresh id and the next stacking slot.
    /// The element is not inserted.
    pub fn mint_element(&mut self, glyph: String, position: DocPoint, size: i32) -> Element {
        let id = ElementId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        let insertion_order = self.next_order;
        self.next_order = self.next_order.saturating_add(1);
        Element {
            id,
            glyph,
            position,
            size,
            insertion_order,
        }
    }

    /// Insert an element at the slot its insertion order dictates.
    pub fn insert(&mut self, element: Element) {
        self.next_id = self.next_id.max(element.id.0.saturating_add(1));
        self.next_order = self.next_order.max(element.insertion_order.saturating_add(1));
        let index = self
            .elements
            .partition_point(|e| e.insertion_order < element.insertion_order);
        self.elements.insert(index, element);
    }

    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let index = self.elements.iter().position(|e| e.id == id)?;
        Some(self.elements.remove(index))
    }

    /// True when every listed element can move by `delta` without leaving
    /// the coordinate range.
    pub fn can_translate(&self, ids: &[ElementId], delta: DocPoint) -> bool {
        self.elements
            .iter()
            .filter(|e| ids.contains(&e.id))
            .all(|e| e.position.checked_offset_by(delta).is_some())
    }

    /// Elements that would overflow stay where they are; check with
    /// [`Self::can_translate`] first.
    pub fn translate(&mut self, ids: &[ElementId], delta: DocPoint) {
        for element in self.elements.iter_mut().filter(|e| ids.contains(&e.id)) {
            if let Some(moved) = element.position.checked_offset_by(delta) {
                element.position = moved;
            }
        }
    }

    pub fn set_size(&mut self, id: ElementId, size: i32) -> bool {
        match self.elements.iter_mut().find(|e| e.id == id) {
            Some(element) => {
                element.size = size;
                true
            }
            None => false,
        }
    }

    /// Replace the background, returning the previous source.
    pub fn set_background(&mut self, source: BackgroundSource) -> BackgroundSource {
        std::mem::replace(&mut self.background, source)
    }
}
