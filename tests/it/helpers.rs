//! Test helpers and builders for reducing boilerplate in tests.
//!
//! This module provides:
//! - `TestCanvasBuilder` - Builder pattern for creating test canvases with glyphs
//! - Contact helpers like `tap()`, `drag()`, `pinch()` that replay a gesture
//! - `png_bytes()` and `wait_for_fetch()` for background tests

#![allow(dead_code)]

use glyphboard::{
    Canvas, CanvasSettings, ContactEvent, ContainerSize, DocPoint, ElementId, FetchStatus, Vec2, ViewState,
};
use std::io::Cursor;
use std::time::{Duration, Instant};

pub const CONTAINER: ContainerSize = ContainerSize::new(300.0, 300.0);

// ============================================================================
// TestCanvasBuilder - Builder pattern for creating test canvases
// ============================================================================

/// Builder for creating test canvases with glyphs and view configuration.
///
/// # Example
/// ```ignore
/// let (canvas, ids) = TestCanvasBuilder::new()
///     .with_glyph("🚀", (0, 0), 40)
///     .with_zoom(2.0)
///     .selecting_all()
///     .build();
/// ```
pub struct TestCanvasBuilder {
    settings: CanvasSettings,
    container: ContainerSize,
    glyphs: Vec<(String, DocPoint, i32)>,
    view: ViewState,
    select_all: bool,
    keep_history: bool,
}

impl Default for TestCanvasBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCanvasBuilder {
    pub fn new() -> Self {
        Self {
            settings: CanvasSettings::default(),
            container: CONTAINER,
            glyphs: Vec::new(),
            view: ViewState::default(),
            select_all: false,
            keep_history: false,
        }
    }

    pub fn with_settings(mut self, settings: CanvasSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_container(mut self, width: f32, height: f32) -> Self {
        self.container = ContainerSize::new(width, height);
        self
    }

    pub fn with_glyph(mut self, glyph: &str, at: (i32, i32), size: i32) -> Self {
        self.glyphs.push((glyph.to_string(), at.into(), size));
        self
    }

    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.view.zoom = zoom;
        self
    }

    pub fn with_pan(mut self, x: f32, y: f32) -> Self {
        self.view.pan = Vec2::new(x, y);
        self
    }

    /// Select every glyph added through the builder.
    pub fn selecting_all(mut self) -> Self {
        self.select_all = true;
        self
    }

    /// Keep the "Add Glyph" commands on the undo stack.
    pub fn keeping_history(mut self) -> Self {
        self.keep_history = true;
        self
    }

    /// Build the canvas. Returns the ids of the glyphs in insertion order.
    pub fn build(self) -> (Canvas, Vec<ElementId>) {
        glyphboard::logging::init_for_tests();
        let mut canvas = Canvas::with_settings(self.settings);
        canvas.set_container_size(self.container);
        canvas.restore_view(self.view);

        let mut ids = Vec::new();
        for (glyph, at, size) in &self.glyphs {
            ids.push(canvas.add_element(glyph, *at, *size).unwrap());
        }
        if !self.keep_history {
            // Start from a clean history, as if the glyphs had been loaded.
            let snapshot = canvas.snapshot();
            canvas.restore(snapshot);
        }
        if self.select_all {
            for &id in &ids {
                canvas.toggle_selection(id);
            }
        }
        (canvas, ids)
    }
}

// ============================================================================
// Contact helpers
// ============================================================================

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// Where an element is drawn right now.
pub fn screen_of(canvas: &Canvas, id: ElementId) -> Vec2 {
    canvas
        .presented_elements()
        .unwrap()
        .into_iter()
        .find(|presented| presented.id == id)
        .map(|presented| presented.screen_position)
        .unwrap()
}

/// Press and lift one contact without moving.
pub fn tap(canvas: &mut Canvas, at: Vec2, at_ms: u64) {
    canvas.handle_contact(ContactEvent::down(1, at.x, at.y, ms(at_ms)));
    canvas.handle_contact(ContactEvent::up(1, at.x, at.y, ms(at_ms + 20)));
}

/// Tap and let the double-tap window run out so the tap takes effect.
pub fn tap_and_settle(canvas: &mut Canvas, at: Vec2, at_ms: u64) {
    tap(canvas, at, at_ms);
    canvas.tick(ms(at_ms + 1000));
}

/// One-contact drag from `from` by `delta`, in a few move steps.
pub fn drag(canvas: &mut Canvas, from: Vec2, delta: Vec2, at_ms: u64) {
    let to = from + delta;
    canvas.handle_contact(ContactEvent::down(1, from.x, from.y, ms(at_ms)));
    for step in 1..=4 {
        let p = from + delta * (step as f32 / 4.0);
        canvas.handle_contact(ContactEvent::moved(1, p.x, p.y, ms(at_ms + step * 16)));
    }
    canvas.handle_contact(ContactEvent::up(1, to.x, to.y, ms(at_ms + 100)));
}

/// Two contacts placed symmetrically around `center`, `start` apart,
/// spread to `end` apart. Contacts stay down when `lift` is false.
pub fn pinch(canvas: &mut Canvas, center: Vec2, start: f32, end: f32, at_ms: u64, lift: bool) {
    let half = |d: f32| Vec2::new(d / 2.0, 0.0);
    let (a, b) = (center - half(start), center + half(start));
    canvas.handle_contact(ContactEvent::down(1, a.x, a.y, ms(at_ms)));
    canvas.handle_contact(ContactEvent::down(2, b.x, b.y, ms(at_ms + 5)));
    let (a, b) = (center - half(end), center + half(end));
    canvas.handle_contact(ContactEvent::moved(1, a.x, a.y, ms(at_ms + 30)));
    canvas.handle_contact(ContactEvent::moved(2, b.x, b.y, ms(at_ms + 30)));
    if lift {
        canvas.handle_contact(ContactEvent::up(1, a.x, a.y, ms(at_ms + 60)));
        canvas.handle_contact(ContactEvent::up(2, b.x, b.y, ms(at_ms + 70)));
    }
}

// ============================================================================
// Background helpers
// ============================================================================

/// Encode a blank PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::DynamicImage::new_rgb8(width, height);
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

/// Drain background completions until the fetch settles or five seconds pass.
pub fn wait_for_fetch(canvas: &mut Canvas) -> FetchStatus {
    let deadline = Instant::now() + Duration::from_secs(5);
    while canvas.fetch_status().is_fetching() && Instant::now() < deadline {
        canvas.wait_for_background(Duration::from_millis(50));
    }
    canvas.fetch_status().clone()
}
