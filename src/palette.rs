//! Palette collaborator.
//!
//! The canvas only needs a string of glyphs to offer the user; how palettes
//! are stored is somebody else's business. [`PaletteStore`] is a small
//! in-memory implementation covering the usual choose/edit/cycle flow.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Anything that can hand out a string of glyph characters on demand.
pub trait PaletteSource {
    fn glyphs(&self) -> String;
}

/// The first grapheme cluster of `text`. Returns `None` for empty text or
/// when it starts with whitespace or a control character.
pub fn first_glyph(text: &str) -> Option<&str> {
    let glyph = text.graphemes(true).next()?;
    let first = glyph.chars().next()?;
    if first.is_whitespace() || first.is_control() {
        return None;
    }
    Some(glyph)
}

/// True when `glyph` is exactly one glyph.
pub fn is_valid_glyph(glyph: &str) -> bool {
    first_glyph(glyph) == Some(glyph)
}

/// Split text into glyphs, skipping whitespace and control characters.
pub fn split_glyphs(text: &str) -> Vec<&str> {
    text.graphemes(true)
        .filter(|glyph| first_glyph(glyph).is_some())
        .collect()
}

/// A named, ordered set of distinct glyphs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub name: String,
    glyphs: String,
}

impl Palette {
    pub fn new(name: impl Into<String>, glyphs: &str) -> Self {
        let mut palette = Self {
            name: name.into(),
            glyphs: String::new(),
        };
        palette.add_glyphs(glyphs);
        palette
    }

    pub fn glyph_list(&self) -> Vec<&str> {
        split_glyphs(&self.glyphs)
    }

    /// Prepend new glyphs, dropping whitespace and duplicates.
    pub fn add_glyphs(&mut self, text: &str) {
        let combined = format!("{text}{}", self.glyphs);
        let mut unique: Vec<&str> = Vec::new();
        for glyph in split_glyphs(&combined) {
            if !unique.contains(&glyph) {
                unique.push(glyph);
            }
        }
        self.glyphs = unique.concat();
    }

    pub fn remove_glyph(&mut self, glyph: &str) -> bool {
        let glyphs = self.glyph_list();
        let kept: Vec<&str> = glyphs.iter().copied().filter(|g| *g != glyph).collect();
        if kept.len() == glyphs.len() {
            return false;
        }
        self.glyphs = kept.concat();
        true
    }
}

impl PaletteSource for Palette {
    fn glyphs(&self) -> String {
        self.glyphs.clone()
    }
}

/// In-memory list of palettes with a current choice. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredPalettes")]
pub struct PaletteStore {
    palettes: Vec<Palette>,
    chosen: usize,
}

#[derive(Deserialize)]
struct StoredPalettes {
    palettes: Vec<Palette>,
    #[serde(default)]
    chosen: usize,
}

impl From<StoredPalettes> for PaletteStore {
    fn from(stored: StoredPalettes) -> Self {
        let mut store = Self::new(stored.palettes);
        store.chosen = stored.chosen.min(store.palettes.len() - 1);
        store
    }
}

impl Default for PaletteStore {
    fn default() -> Self {
        Self {
            palettes: vec![
                Palette::new("Vehicles", "🚗🚕🚙🚌🚎🏎🚓🚑🚒🚐🛻🚚🚛🚜🛵🚲🚀✈️🚁⛵️"),
                Palette::new("Faces", "😀😃😄😁😆😅😂🤣🥲☺️😊😇🙂🙃😉😌😍🥰😘"),
                Palette::new("Weather", "☀️🌤⛅️🌥☁️🌦🌧⛈🌩🌨❄️💨☔️💧🌊🌫🌪"),
            ],
            chosen: 0,
        }
    }
}

impl PaletteStore {
    pub fn new(palettes: Vec<Palette>) -> Self {
        let palettes = if palettes.is_empty() {
            vec![Palette::new("Untitled", "")]
        } else {
            palettes
        };
        Self { palettes, chosen: 0 }
    }

    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }

    /// Palette at `index`, clamped to the last one.
    pub fn palette(&self, index: usize) -> &Palette {
        let index = index.min(self.palettes.len() - 1);
        &self.palettes[index]
    }

    pub fn palette_mut(&mut self, index: usize) -> &mut Palette {
        let index = index.min(self.palettes.len() - 1);
        &mut self.palettes[index]
    }

    pub fn chosen_index(&self) -> usize {
        self.chosen
    }

    pub fn chosen(&self) -> &Palette {
        self.palette(self.chosen)
    }

    /// Advance to the next palette, wrapping around.
    pub fn cycle(&mut self) -> &Palette {
        self.chosen = (self.chosen + 1) % self.palettes.len();
        self.chosen()
    }

    /// Insert a palette at `index` (clamped) and choose it.
    pub fn insert_palette(&mut self, name: impl Into<String>, glyphs: &str, index: usize) {
        let index = index.min(self.palettes.len());
        self.palettes.insert(index, Palette::new(name, glyphs));
        self.chosen = index;
    }

    /// Remove the palette at `index`. The last palette is never removed.
    pub fn remove_palette(&mut self, index: usize) -> bool {
        if self.palettes.len() <= 1 || index >= self.palettes.len() {
            return false;
        }
        self.palettes.remove(index);
        if self.chosen >= self.palettes.len() {
            self.chosen = self.palettes.len() - 1;
        }
        true
    }
}

impl PaletteSource for PaletteStore {
    fn glyphs(&self) -> String {
        self.chosen().glyphs()
    }
}
