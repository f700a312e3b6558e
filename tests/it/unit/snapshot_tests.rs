//! Snapshot tests for the persistence format, using the insta crate.
//!
//! The JSON a snapshot produces is what the persistence collaborator
//! stores, so any change to it shows up here first. To update snapshots
//! after intentional changes:
//! ```sh
//! cargo insta test --accept
//! ```

use crate::helpers::TestCanvasBuilder;
use glyphboard::snapshot::ElementRecord;
use glyphboard::{BackgroundSource, DocPoint, DocumentSnapshot, ElementId};

#[test]
fn snapshot_document_with_url_background() {
    let (mut canvas, _) = TestCanvasBuilder::new()
        .with_glyph("A", (-50, -50), 40)
        .with_glyph("B", (12, 7), 25)
        .build();
    canvas.set_background(BackgroundSource::url("https://example.com/bg.png"), false);

    insta::assert_json_snapshot!(canvas.snapshot(), @r#"
    {
      "background": {
        "kind": "url",
        "url": "https://example.com/bg.png"
      },
      "elements": [
        {
          "id": 0,
          "glyph": "A",
          "x": -50,
          "y": -50,
          "size": 40
        },
        {
          "id": 1,
          "glyph": "B",
          "x": 12,
          "y": 7,
          "size": 25
        }
      ]
    }
    "#);
}

#[test]
fn snapshot_image_data_background() {
    let snapshot = DocumentSnapshot {
        background: BackgroundSource::image_data(vec![1u8, 2, 3]),
        elements: Vec::new(),
    };

    insta::assert_json_snapshot!(snapshot, @r#"
    {
      "background": {
        "kind": "image_data",
        "data": "AQID"
      },
      "elements": []
    }
    "#);
}

#[test]
fn test_restore_keeps_order_and_ids() {
    let snapshot = DocumentSnapshot {
        background: BackgroundSource::None,
        elements: vec![
            ElementRecord {
                id: ElementId(7),
                glyph: "🚀".into(),
                x: 1,
                y: 2,
                size: 30,
            },
            ElementRecord {
                id: ElementId(3),
                glyph: "🚗".into(),
                x: -4,
                y: 0,
                size: 0,
            },
        ],
    };
    let (mut canvas, _) = TestCanvasBuilder::new().build();
    canvas.restore(snapshot);

    let elements = canvas.document().elements();
    assert_eq!(elements[0].id, ElementId(7));
    assert_eq!(elements[1].id, ElementId(3));
    assert_eq!(elements[1].position, DocPoint::new(-4, 0));
    assert_eq!(elements[1].size, 1);
    assert!(elements[0].insertion_order < elements[1].insertion_order);
}

#[test]
fn test_save_and_load_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.json");
    let (canvas, _) = TestCanvasBuilder::new().with_glyph("🚀", (3, 4), 40).build();

    canvas.snapshot().save(&path).unwrap();
    let loaded = DocumentSnapshot::load(&path).unwrap();

    assert_eq!(loaded, canvas.snapshot());
}

#[test]
fn test_restore_with_largest_id_keeps_adding() {
    let snapshot = DocumentSnapshot {
        background: BackgroundSource::None,
        elements: vec![
            ElementRecord {
                id: ElementId(u64::MAX),
                glyph: "🚀".into(),
                x: 0,
                y: 0,
                size: 30,
            },
            ElementRecord {
                id: ElementId(9),
                glyph: "🚗".into(),
                x: 1,
                y: 1,
                size: 30,
            },
        ],
    };
    let (mut canvas, _) = TestCanvasBuilder::new().build();
    canvas.restore(snapshot);

    assert_eq!(canvas.document().len(), 1);
    let id = canvas.add_element("🌵", DocPoint::ORIGIN, 40).unwrap();
    assert_eq!(id, ElementId(10));
}
