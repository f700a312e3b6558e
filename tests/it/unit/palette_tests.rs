use glyphboard::palette::{Palette, PaletteSource, PaletteStore, first_glyph, split_glyphs};

#[test]
fn test_default_store_offers_vehicles_first() {
    let mut store = PaletteStore::default();

    assert_eq!(store.len(), 3);
    assert_eq!(store.chosen().name, "Vehicles");
    assert_eq!(first_glyph(&store.glyphs()), Some("🚗"));

    store.cycle();
    store.cycle();
    assert_eq!(store.chosen().name, "Weather");
    assert_eq!(store.cycle().name, "Vehicles");
}

#[test]
fn test_empty_store_gets_a_placeholder() {
    let store = PaletteStore::new(Vec::new());
    assert_eq!(store.len(), 1);
    assert!(store.glyphs().is_empty());
}

#[test]
fn test_split_skips_whitespace_and_keeps_sequences() {
    assert_eq!(split_glyphs("🚀 🇯🇵\n👍🏽x"), vec!["🚀", "🇯🇵", "👍🏽", "x"]);
    assert!(split_glyphs(" \t\n").is_empty());
}

#[test]
fn test_palette_edits() {
    let mut palette = Palette::new("Food", "🍎🍐🍎");
    assert_eq!(palette.glyph_list(), vec!["🍎", "🍐"]);

    palette.add_glyphs("🥕");
    assert_eq!(palette.glyphs(), "🥕🍎🍐");
    assert!(palette.remove_glyph("🍎"));
    assert_eq!(palette.glyph_list(), vec!["🥕", "🍐"]);
}

#[test]
fn test_editing_through_the_store() {
    let mut store = PaletteStore::default();
    store.insert_palette("Mine", "🌵", 1);
    assert_eq!(store.chosen_index(), 1);

    store.palette_mut(1).add_glyphs("🌴");
    assert_eq!(store.glyphs(), "🌴🌵");

    assert!(store.remove_palette(1));
    assert_eq!(store.len(), 3);
    assert!(!store.remove_palette(7));
}

#[test]
fn test_store_round_trips_through_json() {
    let mut store = PaletteStore::default();
    store.cycle();

    let json = serde_json::to_string(&store).unwrap();
    let restored: PaletteStore = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, store);
    assert_eq!(restored.chosen().name, "Faces");
}
