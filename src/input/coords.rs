//! Coordinate conversion between screen space and document space.
//!
//! Document space is centered on the container: document origin sits at
//! the container center when there is no pan. All conversions go through
//! here so the formulas live in one place.

use crate::error::{CanvasError, CanvasResult};
use crate::geometry::{ContainerSize, DocPoint, Vec2};
use crate::transform::TransformState;

/// Context needed for coordinate conversions
#[derive(Debug, Clone, Copy)]
pub struct CoordinateContext<'a> {
    pub container: ContainerSize,
    pub transform: &'a TransformState,
}

impl<'a> CoordinateContext<'a> {
    /// Create a context, failing when the container has no area.
    #[inline]
    pub fn new(container: ContainerSize, transform: &'a TransformState) -> CanvasResult<Self> {
        if container.is_degenerate() {
            return Err(CanvasError::InvalidGeometry {
                width: container.width,
                height: container.height,
            });
        }
        Ok(Self { container, transform })
    }
}

pub struct CoordinateMapper;

impl CoordinateMapper {
    /// Convert a document point to a screen position.
    pub fn to_screen(doc: DocPoint, container: ContainerSize, transform: &TransformState) -> CanvasResult<Vec2> {
        let ctx = CoordinateContext::new(container, transform)?;
        Ok(Self::to_screen_in(doc.as_vec2(), &ctx))
    }

    /// Convert a document-space vector to a screen position within a
    /// validated context.
    #[inline]
    pub fn to_screen_in(doc: Vec2, ctx: &CoordinateContext<'_>) -> Vec2 {
        let zoom = ctx.transform.effective_zoom();
        ctx.container.center() + doc * zoom + ctx.transform.effective_pan()
    }

    /// Convert a screen position to a document point, truncating toward zero.
    ///
    /// `active_offset` is the in-flight selection drag offset in screen
    /// units. When present it is taken out of the pan term, so points
    /// computed mid-drag agree with where the drag will leave the elements.
    pub fn to_document(
        screen: Vec2,
        container: ContainerSize,
        transform: &TransformState,
        active_offset: Option<Vec2>,
    ) -> CanvasResult<DocPoint> {
        Self::to_document_precise(screen, container, transform, active_offset).map(Vec2::truncate)
    }

    /// Same as [`CoordinateMapper::to_document`] without truncation.
    pub fn to_document_precise(
        screen: Vec2,
        container: ContainerSize,
        transform: &TransformState,
        active_offset: Option<Vec2>,
    ) -> CanvasResult<Vec2> {
        let ctx = CoordinateContext::new(container, transform)?;
        Ok(Self::to_document_in(screen, &ctx, active_offset))
    }

    #[inline]
    pub fn to_document_in(screen: Vec2, ctx: &CoordinateContext<'_>, active_offset: Option<Vec2>) -> Vec2 {
        let mut total_offset = ctx.transform.effective_pan();
        if let Some(offset) = active_offset {
            total_offset -= offset;
        }
        (screen - total_offset - ctx.container.center()) / ctx.transform.effective_zoom()
    }

    /// Convert a delta from screen to document units (for drag operations)
    #[inline]
    pub fn delta_to_document(delta: Vec2, transform: &TransformState) -> Vec2 {
        transform.delta_to_document(delta)
    }

    /// Convert a delta from document to screen units
    #[inline]
    pub fn delta_to_screen(delta: Vec2, transform: &TransformState) -> Vec2 {
        delta * transform.effective_zoom()
    }
}
