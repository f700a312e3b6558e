//! Spatial Index Module
//!
//! Provides R-tree based spatial indexing for hit testing contacts against
//! placed glyphs. Each glyph occupies a square frame centered on its
//! position, a little larger than its font size.

use crate::constants::HIT_FRAME_FACTOR;
use crate::geometry::Vec2;
use crate::model::{Element, ElementId};
use rstar::{AABB, RTree, RTreeObject};

/// A glyph's hit frame in document space.
#[derive(Debug, Clone, Copy)]
pub struct SpatialEntry {
    pub element_id: ElementId,
    pub insertion_order: u64,
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl SpatialEntry {
    pub fn for_element(element: &Element) -> Self {
        let half = element.size as f32 * HIT_FRAME_FACTOR / 2.0;
        let center = element.position.as_vec2();
        Self {
            element_id: element.id,
            insertion_order: element.insertion_order,
            min_x: center.x - half,
            min_y: center.y - half,
            max_x: center.x + half,
            max_y: center.y + half,
        }
    }

    #[inline]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.min_x, self.min_y], [self.max_x, self.max_y])
    }
}

impl PartialEq for SpatialEntry {
    fn eq(&self, other: &Self) -> bool {
        self.element_id == other.element_id
    }
}

/// Spatial index over element hit frames.
#[derive(Default)]
pub struct SpatialIndex {
    tree: RTree<SpatialEntry>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements<'a, I>(elements: I) -> Self
    where
        I: IntoIterator<Item = &'a Element>,
    {
        let entries: Vec<SpatialEntry> = elements.into_iter().map(SpatialEntry::for_element).collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    pub fn rebuild<'a, I>(&mut self, elements: I)
    where
        I: IntoIterator<Item = &'a Element>,
    {
        *self = Self::from_elements(elements);
    }

    /// All elements whose frame contains the document point.
    pub fn query_point(&self, point: Vec2) -> Vec<ElementId> {
        let envelope = AABB::from_point([point.x, point.y]);
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .filter(|entry| entry.contains_point(point.x, point.y))
            .map(|entry| entry.element_id)
            .collect()
    }

    /// The element drawn on top at the document point, if any.
    pub fn topmost_at(&self, point: Vec2) -> Option<ElementId> {
        let envelope = AABB::from_point([point.x, point.y]);
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .filter(|entry| entry.contains_point(point.x, point.y))
            .max_by_key(|entry| entry.insertion_order)
            .map(|entry| entry.element_id)
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
